//! Host-side simulation harness
//!
//! Drives a full coordinator against mock lamps, a mock display and a
//! manually advanced clock, recording every phase transition and checking
//! the safety invariants on every step. Scenario and property tests build on
//! this instead of wiring mocks by hand.

use std::cell::Cell;
use std::vec::Vec;

use crate::coordinator::Coordinator;
use crate::hal::mock::{MockDisplay, MockLampBus};
use crate::sensors::SensorLatch;
use crate::timers::{ticks_from_ms, TickSource, Ticks};
use crate::types::{
    CrosswalkId, IntersectionId, Lane, Notice, TimingConfig, VehiclePhase, WalkPhase,
};

/// Manually advanced tick source
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<Ticks>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ticks: Ticks) {
        self.now.set(self.now.get() + ticks);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(ticks_from_ms(ms));
    }
}

impl TickSource for SimClock {
    fn now_ticks(&self) -> Ticks {
        self.now.get()
    }
}

/// Poll interval used by the harness, matching the firmware loop cadence
pub const POLL_INTERVAL_MS: u64 = 5;

/// A coordinator under simulation
pub struct Harness {
    pub latch: SensorLatch,
    pub coordinator: Coordinator<MockLampBus, MockDisplay>,
    now: Ticks,
    /// Per-intersection phase transition log as (tick, new phase)
    transitions: [Vec<(Ticks, VehiclePhase)>; 2],
    /// Every notice the display sink received
    pub notices: Vec<Notice>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_timing(TimingConfig::default())
    }

    pub fn with_timing(timing: TimingConfig) -> Self {
        timing.validate().expect("timing plan must be valid");
        let coordinator = Coordinator::new(MockLampBus::new(), MockDisplay::new(), timing)
            .expect("mock bus cannot fail");
        Self {
            latch: SensorLatch::new(),
            coordinator,
            now: 0,
            transitions: [Vec::new(), Vec::new()],
            notices: Vec::new(),
        }
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Latch a vehicle presence edge, logging the notice if one fired
    pub fn set_car(&mut self, lane: u8, present: bool) {
        let Some(lane) = Lane::from_number(lane) else {
            return;
        };
        if let Some(notice) = self.latch.car_edge(lane, present) {
            self.notices.push(notice);
        }
    }

    /// Press a crossing button; true if the request latched
    pub fn press_button(&mut self, crosswalk: u8) -> bool {
        let Some(crosswalk) = CrosswalkId::from_number(crosswalk) else {
            return false;
        };
        match self.latch.request_crossing(crosswalk) {
            Some(notice) => {
                self.notices.push(notice);
                true
            }
            None => false,
        }
    }

    /// Run the coordinator for `ms` of simulated time, polling on the
    /// firmware cadence and checking the safety invariants on every step
    pub fn run_ms(&mut self, ms: u64) {
        let end = self.now + ticks_from_ms(ms);
        while self.now < end {
            self.coordinator
                .poll(&self.latch, self.now)
                .expect("mock bus cannot fail");
            self.record();
            self.check_invariants();
            self.now += ticks_from_ms(POLL_INTERVAL_MS);
        }
    }

    fn record(&mut self) {
        for id in IntersectionId::BOTH {
            let phase = self.coordinator.vehicle_phase(id.number()).unwrap();
            let log = &mut self.transitions[id.index()];
            if log.last().map(|(_, p)| *p) != Some(phase) {
                log.push((self.now, phase));
            }
        }
        let drained: Vec<Notice> = self
            .coordinator
            .display_mut()
            .notices
            .iter()
            .copied()
            .collect();
        self.coordinator.display_mut().notices.clear();
        self.notices.extend(drained);
    }

    fn check_invariants(&self) {
        // Never green in both directions.
        assert!(
            !(self.vehicle_phase(1) == VehiclePhase::Green
                && self.vehicle_phase(2) == VehiclePhase::Green),
            "both intersections green at tick {}",
            self.now
        );
        // Walk implies the crossed road is red.
        for id in IntersectionId::BOTH {
            if self.walk_phase(id.crosswalk().number()) == WalkPhase::Walk {
                assert!(
                    self.vehicle_phase(id.number()) == VehiclePhase::Red,
                    "walk asserted over non-red road {} at tick {}",
                    id.number(),
                    self.now
                );
            }
        }
    }

    pub fn vehicle_phase(&self, intersection: u8) -> VehiclePhase {
        self.coordinator.vehicle_phase(intersection).unwrap()
    }

    pub fn walk_phase(&self, crosswalk: u8) -> WalkPhase {
        self.coordinator.walk_phase(crosswalk).unwrap()
    }

    pub fn lamp_lit(&self, mask: u32) -> bool {
        self.coordinator.bus().is_lit(mask)
    }

    /// Recorded phase transitions for one intersection
    pub fn transitions(&self, intersection: u8) -> &[(Ticks, VehiclePhase)] {
        let id = IntersectionId::from_number(intersection).expect("intersection 1 or 2");
        &self.transitions[id.index()]
    }

    /// Duration of every completed yellow interval for one intersection
    pub fn yellow_dwells(&self, intersection: u8) -> Vec<Ticks> {
        let log = self.transitions(intersection);
        let mut dwells = Vec::new();
        let mut yellow_since = None;
        for (tick, phase) in log {
            match phase {
                VehiclePhase::Yellow => yellow_since = Some(*tick),
                _ => {
                    if let Some(start) = yellow_since.take() {
                        dwells.push(tick - start);
                    }
                }
            }
        }
        dwells
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
