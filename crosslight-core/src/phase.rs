//! Staged vehicle phase transitions
//!
//! Bringing an intersection down from green (or up from red) is a two-stage
//! sequence gated on the shared transition timer: dwell on the current
//! colour, show yellow for the mandatory interval, then land on the terminal
//! colour. Each call advances at most one stage, so the coordinator keeps
//! polling until the phase reads terminal.

use crate::lights::{vehicle_masks, LampBus};
use crate::timers::{SoftTimer, Ticks};
use crate::types::{Intersection, IntersectionId, TimingConfig, VehiclePhase};

/// Vehicle lamp state for both intersections plus the transition stage
pub struct PhaseControl {
    lights: [Intersection; 2],
    stage: u8,
}

impl PhaseControl {
    /// Power-on phase state: intersection 1 red, intersection 2 green
    pub const fn new() -> Self {
        Self {
            lights: [
                Intersection::new(IntersectionId::One, VehiclePhase::Red),
                Intersection::new(IntersectionId::Two, VehiclePhase::Green),
            ],
            stage: 0,
        }
    }

    pub fn phase(&self, id: IntersectionId) -> VehiclePhase {
        self.lights[id.index()].phase()
    }

    pub fn is_green(&self, id: IntersectionId) -> bool {
        self.phase(id).is_green()
    }

    pub fn is_red(&self, id: IntersectionId) -> bool {
        self.phase(id).is_red()
    }

    /// Advance one stage of the green-to-red sequence for intersection `n`
    /// (wire number 1 or 2; anything else is a no-op)
    ///
    /// Stage 0 dwells on green for the clear interval, then swaps to yellow.
    /// Stage 1 dwells on yellow, then lands on red and restarts the timer so
    /// the caller can measure the pedestrian release interval from the
    /// moment red was reached. Calling on an already-red intersection does
    /// nothing.
    pub fn start_stopping<B: LampBus>(
        &mut self,
        intersection: u8,
        bus: &mut B,
        transition: &mut SoftTimer,
        timing: &TimingConfig,
        now: Ticks,
    ) -> Result<(), B::Error> {
        let Some(id) = IntersectionId::from_number(intersection) else {
            return Ok(());
        };
        let masks = vehicle_masks(id);

        match self.stage {
            0 => {
                if self.is_red(id) {
                    return Ok(());
                }
                if transition.elapsed(now) >= timing.clear_dwell {
                    transition.stop_and_reset();
                    bus.clear_bits(masks.green)?;
                    bus.set_bits(masks.yellow)?;
                    self.lights[id.index()].set_phase(VehiclePhase::Yellow);
                    transition.start(now);
                    self.stage = 1;
                }
            }
            _ => {
                if transition.elapsed(now) >= timing.yellow_dwell {
                    transition.stop_and_reset();
                    bus.clear_bits(masks.yellow)?;
                    bus.set_bits(masks.red)?;
                    self.lights[id.index()].set_phase(VehiclePhase::Red);
                    transition.start(now);
                    self.stage = 0;
                }
            }
        }
        Ok(())
    }

    /// Advance one stage of the red-to-green sequence for intersection `n`
    /// (wire number 1 or 2; anything else is a no-op)
    ///
    /// Mirrors [`PhaseControl::start_stopping`], except the timer is left
    /// stopped once green is reached; steady green has no dwell to measure.
    pub fn start_going<B: LampBus>(
        &mut self,
        intersection: u8,
        bus: &mut B,
        transition: &mut SoftTimer,
        timing: &TimingConfig,
        now: Ticks,
    ) -> Result<(), B::Error> {
        let Some(id) = IntersectionId::from_number(intersection) else {
            return Ok(());
        };
        let masks = vehicle_masks(id);

        match self.stage {
            0 => {
                if self.is_green(id) {
                    return Ok(());
                }
                if transition.elapsed(now) >= timing.clear_dwell {
                    transition.stop_and_reset();
                    bus.clear_bits(masks.red)?;
                    bus.set_bits(masks.yellow)?;
                    self.lights[id.index()].set_phase(VehiclePhase::Yellow);
                    transition.start(now);
                    self.stage = 1;
                }
            }
            _ => {
                if transition.elapsed(now) >= timing.yellow_dwell {
                    transition.stop_and_reset();
                    bus.clear_bits(masks.yellow)?;
                    bus.set_bits(masks.green)?;
                    self.lights[id.index()].set_phase(VehiclePhase::Green);
                    self.stage = 0;
                }
            }
        }
        Ok(())
    }
}

impl Default for PhaseControl {
    fn default() -> Self {
        Self::new()
    }
}
