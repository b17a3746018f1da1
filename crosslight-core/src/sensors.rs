//! ISR-safe latched sensor inputs
//!
//! Vehicle presence edges and pedestrian button presses arrive from interrupt
//! context; the coordinator consumes them from its poll loop. Everything in
//! here is lock-free atomics so a `&SensorLatch` can be shared freely between
//! both sides.

use portable_atomic::{AtomicBool, Ordering};

use crate::types::{CrosswalkId, IntersectionId, Lane, Notice};

/// Latched sensor state shared between interrupt handlers and the poll loop
///
/// A pedestrian request latches only while the button's own crosswalk shows
/// DontWalk, and stays latched until the coordinator grants walk. Repeated
/// presses while a request is pending are absorbed without a second notice.
pub struct SensorLatch {
    /// Per-lane vehicle presence, true while a car sits on the sensor
    cars: [AtomicBool; 4],
    /// Per-crosswalk latched crossing request
    requests: [AtomicBool; 2],
    /// Mirror of each crosswalk's DontWalk state, written by the coordinator
    /// so the button edge handler can gate latching without touching it
    dont_walk: [AtomicBool; 2],
}

impl SensorLatch {
    /// Power-on state: no cars, no requests, crosswalk 1 walking and
    /// crosswalk 2 held (matching the initial lamp pattern)
    pub const fn new() -> Self {
        Self {
            cars: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            requests: [AtomicBool::new(false), AtomicBool::new(false)],
            dont_walk: [AtomicBool::new(false), AtomicBool::new(true)],
        }
    }

    /// Record a vehicle presence edge from interrupt context
    ///
    /// Returns a notice only when the latched state actually changed, so a
    /// bouncing sensor line cannot flood the display queue.
    pub fn car_edge(&self, lane: Lane, present: bool) -> Option<Notice> {
        let was = self.cars[lane.index()].swap(present, Ordering::Relaxed);
        if was == present {
            return None;
        }
        Some(if present {
            Notice::CarActive(lane)
        } else {
            Notice::CarInactive(lane)
        })
    }

    pub fn car_present(&self, lane: Lane) -> bool {
        self.cars[lane.index()].load(Ordering::Relaxed)
    }

    /// True if any of the four lanes has a waiting car
    pub fn any_car_active(&self) -> bool {
        Lane::ALL.iter().any(|lane| self.car_present(*lane))
    }

    /// True if either lane feeding the given intersection has a waiting car
    pub fn cars_at(&self, id: IntersectionId) -> bool {
        Lane::ALL
            .iter()
            .any(|lane| lane.intersection() == id && self.car_present(*lane))
    }

    /// Record a pedestrian button press from interrupt context
    ///
    /// The press latches only while the crosswalk shows DontWalk; a press
    /// during walk is ignored entirely. Returns a notice on the first latch.
    pub fn request_crossing(&self, crosswalk: CrosswalkId) -> Option<Notice> {
        if !self.dont_walk[crosswalk.index()].load(Ordering::Relaxed) {
            return None;
        }
        let was = self.requests[crosswalk.index()].swap(true, Ordering::Relaxed);
        if was {
            return None;
        }
        Some(Notice::PedestrianWaiting(crosswalk))
    }

    pub fn request_pending(&self, crosswalk: CrosswalkId) -> bool {
        self.requests[crosswalk.index()].load(Ordering::Relaxed)
    }

    // Consumed by the pedestrian controller once walk is granted.
    pub(crate) fn clear_request(&self, crosswalk: CrosswalkId) {
        self.requests[crosswalk.index()].store(false, Ordering::Relaxed);
    }

    // Keeps the button-gating mirror in step with the lamp state.
    pub(crate) fn note_dont_walk(&self, crosswalk: CrosswalkId, dont_walk: bool) {
        self.dont_walk[crosswalk.index()].store(dont_walk, Ordering::Relaxed);
    }

    /// Reset to the power-on state
    #[cfg(feature = "test-utils")]
    pub fn reset(&self) {
        for car in &self.cars {
            car.store(false, Ordering::Relaxed);
        }
        for request in &self.requests {
            request.store(false, Ordering::Relaxed);
        }
        self.dont_walk[0].store(false, Ordering::Relaxed);
        self.dont_walk[1].store(true, Ordering::Relaxed);
    }
}

impl Default for SensorLatch {
    fn default() -> Self {
        Self::new()
    }
}
