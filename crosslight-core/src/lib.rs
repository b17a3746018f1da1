#![cfg_attr(not(feature = "std"), no_std)]

//! # Crosslight Core
//!
//! Coordination core for a dual-intersection traffic signal controller.
//! Two independently signalled road crossings share one physical controller;
//! this crate decides which intersection may show green, when pedestrians may
//! cross, and when control yields between the two, driven by latched sensor
//! edges and elapsed-tick gates.
//!
//! The crate is hardware-agnostic: lamps are written through the [`LampBus`]
//! seam, status text goes to a best-effort [`StatusDisplay`] sink, and all
//! timing runs off an injected monotonic tick count so the whole state
//! machine can be exercised against a simulated clock.

pub mod types;
pub mod timers;
pub mod sensors;
pub mod lights;
pub mod hal;
pub mod phase;
pub mod pedestrian;
pub mod coordinator;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use types::*;
pub use timers::*;
pub use sensors::*;
pub use lights::{LampBus, INIT_STATE};
pub use hal::{HalError, StatusDisplay};
pub use phase::*;
pub use pedestrian::*;
pub use coordinator::*;

/// Crosslight library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timing plan matching the reference hardware configuration
pub fn default_timing() -> TimingConfig {
    TimingConfig::default()
}
