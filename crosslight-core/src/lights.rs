//! Lamp bus seam and the physical lamp bit layout
//!
//! All lamps hang off a chain of three 8-bit shift registers, so the full
//! panel is a 24-bit mask. The coordinator only ever sets and clears bits
//! through [`LampBus`]; the concrete SPI transport lives in [`crate::hal`].

use crate::types::{CrosswalkId, IntersectionId};

/// Write access to the lamp shift-register chain
///
/// Implementations keep a shadow of the full mask and push it out on every
/// change, so set and clear are read-modify-write on the shadow only.
pub trait LampBus {
    type Error;

    /// Turn on every lamp in `mask`, leaving the rest untouched
    fn set_bits(&mut self, mask: u32) -> Result<(), Self::Error>;

    /// Turn off every lamp in `mask`, leaving the rest untouched
    fn clear_bits(&mut self, mask: u32) -> Result<(), Self::Error>;
}

/// Bit positions of every lamp in the 24-bit chain
///
/// TL1/TL3 are the two vehicle heads of intersection 1, TL2/TL4 those of
/// intersection 2. PL1/PL2 are the pedestrian heads; blue is the
/// request-pending blink indicator.
pub mod mask {
    pub const TL1_RED: u32 = 0x010000;
    pub const TL1_YELLOW: u32 = 0x020000;
    pub const TL1_GREEN: u32 = 0x040000;
    pub const PL1_RED: u32 = 0x080000;
    pub const PL1_GREEN: u32 = 0x100000;
    pub const PL1_BLUE: u32 = 0x200000;

    pub const TL2_RED: u32 = 0x0100;
    pub const TL2_YELLOW: u32 = 0x0200;
    pub const TL2_GREEN: u32 = 0x0400;
    pub const PL2_RED: u32 = 0x0800;
    pub const PL2_GREEN: u32 = 0x1000;
    pub const PL2_BLUE: u32 = 0x2000;

    pub const TL3_RED: u32 = 0x01;
    pub const TL3_YELLOW: u32 = 0x02;
    pub const TL3_GREEN: u32 = 0x04;

    pub const TL4_RED: u32 = 0x08;
    pub const TL4_YELLOW: u32 = 0x10;
    pub const TL4_GREEN: u32 = 0x20;
}

/// Power-on lamp pattern: intersection 2 green with its crosswalk held,
/// intersection 1 red with its crosswalk walking
pub const INIT_STATE: u32 = mask::TL2_GREEN
    | mask::TL4_GREEN
    | mask::PL2_RED
    | mask::TL1_RED
    | mask::TL3_RED
    | mask::PL1_GREEN;

/// Combined red/yellow/green masks covering both heads of one intersection
#[derive(Copy, Clone, Debug)]
pub struct VehicleMasks {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

pub const fn vehicle_masks(id: IntersectionId) -> VehicleMasks {
    match id {
        IntersectionId::One => VehicleMasks {
            red: mask::TL1_RED | mask::TL3_RED,
            yellow: mask::TL1_YELLOW | mask::TL3_YELLOW,
            green: mask::TL1_GREEN | mask::TL3_GREEN,
        },
        IntersectionId::Two => VehicleMasks {
            red: mask::TL2_RED | mask::TL4_RED,
            yellow: mask::TL2_YELLOW | mask::TL4_YELLOW,
            green: mask::TL2_GREEN | mask::TL4_GREEN,
        },
    }
}

/// Lamp masks of one pedestrian head
#[derive(Copy, Clone, Debug)]
pub struct WalkMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

pub const fn walk_masks(crosswalk: CrosswalkId) -> WalkMasks {
    match crosswalk {
        CrosswalkId::One => WalkMasks {
            red: mask::PL1_RED,
            green: mask::PL1_GREEN,
            blue: mask::PL1_BLUE,
        },
        CrosswalkId::Two => WalkMasks {
            red: mask::PL2_RED,
            green: mask::PL2_GREEN,
            blue: mask::PL2_BLUE,
        },
    }
}
