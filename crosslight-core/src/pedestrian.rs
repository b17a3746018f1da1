//! Pedestrian walk phases and the request-pending blink indicator

use crate::lights::{walk_masks, LampBus};
use crate::sensors::SensorLatch;
use crate::timers::{SoftTimer, Ticks};
use crate::types::{Crosswalk, CrosswalkId, Notice, WalkPhase};

/// Walk lamp state for both crosswalks
pub struct PedestrianControl {
    crosswalks: [Crosswalk; 2],
}

impl PedestrianControl {
    /// Power-on walk state: crosswalk 1 walking, crosswalk 2 held
    pub const fn new() -> Self {
        Self {
            crosswalks: [
                Crosswalk::new(CrosswalkId::One, WalkPhase::Walk),
                Crosswalk::new(CrosswalkId::Two, WalkPhase::DontWalk),
            ],
        }
    }

    pub fn walk_phase(&self, crosswalk: CrosswalkId) -> WalkPhase {
        self.crosswalks[crosswalk.index()].walk()
    }

    pub fn is_walk(&self, crosswalk: CrosswalkId) -> bool {
        matches!(self.walk_phase(crosswalk), WalkPhase::Walk)
    }

    pub fn is_dont_walk(&self, crosswalk: CrosswalkId) -> bool {
        matches!(self.walk_phase(crosswalk), WalkPhase::DontWalk)
    }

    pub fn blink_on(&self, crosswalk: CrosswalkId) -> bool {
        self.crosswalks[crosswalk.index()].blink_on()
    }

    /// Grant walk on crosswalk `n` (wire number 1 or 2; anything else is a
    /// no-op)
    ///
    /// Swaps the pedestrian head to green and unblocks the button latch. If
    /// a request was pending the walk-hold backstop is armed so the grant
    /// cannot outlive its bound.
    pub fn set_walk<B: LampBus>(
        &mut self,
        crosswalk: u8,
        bus: &mut B,
        latch: &SensorLatch,
        walk_hold: &mut SoftTimer,
        now: Ticks,
    ) -> Result<Option<Notice>, B::Error> {
        let Some(id) = CrosswalkId::from_number(crosswalk) else {
            return Ok(None);
        };
        if self.is_walk(id) {
            return Ok(None);
        }
        let masks = walk_masks(id);
        bus.clear_bits(masks.red)?;
        bus.set_bits(masks.green)?;
        self.crosswalks[id.index()].set_walk(WalkPhase::Walk);
        latch.note_dont_walk(id, false);
        if latch.request_pending(id) {
            walk_hold.start(now);
        }
        Ok(Some(Notice::WalkOn(id)))
    }

    /// Revoke walk on crosswalk `n` (wire number 1 or 2; anything else is a
    /// no-op)
    pub fn set_dont_walk<B: LampBus>(
        &mut self,
        crosswalk: u8,
        bus: &mut B,
        latch: &SensorLatch,
    ) -> Result<Option<Notice>, B::Error> {
        let Some(id) = CrosswalkId::from_number(crosswalk) else {
            return Ok(None);
        };
        if self.is_dont_walk(id) {
            return Ok(None);
        }
        let masks = walk_masks(id);
        bus.clear_bits(masks.green)?;
        bus.set_bits(masks.red)?;
        self.crosswalks[id.index()].set_walk(WalkPhase::DontWalk);
        latch.note_dont_walk(id, true);
        Ok(Some(Notice::WalkOff(id)))
    }

    /// One blink-timer expiry: toggle the indicator of the crosswalk whose
    /// request is still waiting, or retire a request whose walk has been
    /// granted
    ///
    /// At most one crosswalk is acted on per call; with both pending the
    /// lower-numbered one wins until its request retires.
    pub fn blink_tick<B: LampBus>(
        &mut self,
        bus: &mut B,
        latch: &SensorLatch,
        blink: &mut SoftTimer,
    ) -> Result<(), B::Error> {
        for id in CrosswalkId::BOTH {
            if latch.request_pending(id) && self.is_dont_walk(id) {
                let on = !self.blink_on(id);
                let blue = walk_masks(id).blue;
                if on {
                    bus.set_bits(blue)?;
                } else {
                    bus.clear_bits(blue)?;
                }
                self.crosswalks[id.index()].set_blink(on);
                return Ok(());
            }
        }
        for id in CrosswalkId::BOTH {
            if latch.request_pending(id) && self.is_walk(id) {
                bus.clear_bits(walk_masks(id).blue)?;
                self.crosswalks[id.index()].set_blink(false);
                latch.clear_request(id);
                blink.stop_and_reset();
                return Ok(());
            }
        }
        Ok(())
    }
}

impl Default for PedestrianControl {
    fn default() -> Self {
        Self::new()
    }
}
