//! Top-level coordination state machine
//!
//! The coordinator owns the lamp bus, the display sink, the timer bank and
//! both lamp controllers. It is advanced by calling [`Coordinator::poll`]
//! with the current tick count; every poll services the blink indicator and
//! the walk-hold backstop first, then runs one step of whichever top-level
//! state is active. Timers are started and stopped only from here, so every
//! dwell decision is visible in one place.

use crate::hal::StatusDisplay;
use crate::lights::{LampBus, INIT_STATE};
use crate::pedestrian::PedestrianControl;
use crate::phase::PhaseControl;
use crate::sensors::SensorLatch;
use crate::timers::{Ticks, TimerBank};
use crate::types::{
    CoordinatorState, CrosswalkId, IntersectionId, ServeStage, TimingConfig, VehiclePhase,
    WalkPhase,
};

/// Dual-intersection signal coordinator
pub struct Coordinator<B, D> {
    bus: B,
    display: D,
    timing: TimingConfig,
    timers: TimerBank,
    phase: PhaseControl,
    walk: PedestrianControl,
    state: CoordinatorState,
    stage: ServeStage,
}

impl<B: LampBus, D: StatusDisplay> Coordinator<B, D> {
    /// Build a coordinator and drive the lamps to the power-on pattern
    ///
    /// `timing` is taken as given; call [`TimingConfig::validate`] before
    /// handing over a non-default plan.
    pub fn new(mut bus: B, display: D, timing: TimingConfig) -> Result<Self, B::Error> {
        bus.set_bits(INIT_STATE)?;
        Ok(Self {
            bus,
            display,
            timing,
            timers: TimerBank::new(),
            phase: PhaseControl::new(),
            walk: PedestrianControl::new(),
            state: CoordinatorState::Serve(IntersectionId::Two),
            stage: ServeStage::YieldOther,
        })
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn serve_stage(&self) -> ServeStage {
        self.stage
    }

    pub fn vehicle_phase(&self, intersection: u8) -> Option<VehiclePhase> {
        IntersectionId::from_number(intersection).map(|id| self.phase.phase(id))
    }

    pub fn walk_phase(&self, crosswalk: u8) -> Option<WalkPhase> {
        CrosswalkId::from_number(crosswalk).map(|cw| self.walk.walk_phase(cw))
    }

    pub fn blink_on(&self, crosswalk: u8) -> Option<bool> {
        CrosswalkId::from_number(crosswalk).map(|cw| self.walk.blink_on(cw))
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Run one coordination step at tick `now`
    pub fn poll(&mut self, latch: &SensorLatch, now: Ticks) -> Result<(), B::Error> {
        self.service_blink(latch, now)?;
        self.service_walk_hold(latch, now)?;

        match self.state {
            CoordinatorState::Serve(target) => self.poll_serve(target, latch, now),
            CoordinatorState::ShortWait => self.poll_short_wait(latch, now),
            CoordinatorState::LongWait => self.poll_long_wait(latch, now),
        }
    }

    fn poll_serve(
        &mut self,
        target: IntersectionId,
        latch: &SensorLatch,
        now: Ticks,
    ) -> Result<(), B::Error> {
        let other = target.other();
        match self.stage {
            ServeStage::YieldOther => {
                if self.phase.is_green(target) {
                    // Lamps already favour the target; nothing to yield.
                    self.stage = ServeStage::TurnGreen;
                    return Ok(());
                }
                if !self.phase.is_red(other) {
                    return self.phase.start_stopping(
                        other.number(),
                        &mut self.bus,
                        &mut self.timers.transition,
                        &self.timing,
                        now,
                    );
                }
                // The other road is red; let its crosswalk clear before the
                // walk phases are handed over.
                if self.timers.transition.elapsed(now) >= self.timing.pedestrian_release {
                    self.timers.transition.stop_and_reset();
                    let off = self.walk.set_dont_walk(
                        target.crosswalk().number(),
                        &mut self.bus,
                        latch,
                    )?;
                    let on = self.walk.set_walk(
                        other.crosswalk().number(),
                        &mut self.bus,
                        latch,
                        &mut self.timers.walk_hold,
                        now,
                    )?;
                    if let Some(notice) = off {
                        self.display.notice(notice);
                    }
                    if let Some(notice) = on {
                        self.display.notice(notice);
                    }
                    self.timers.transition.start(now);
                    self.stage = ServeStage::TurnGreen;
                }
                Ok(())
            }
            ServeStage::TurnGreen => {
                // Green is gated on the target's own crosswalk being held.
                if self.walk.is_dont_walk(target.crosswalk()) {
                    self.phase.start_going(
                        target.number(),
                        &mut self.bus,
                        &mut self.timers.transition,
                        &self.timing,
                        now,
                    )?;
                }
                if self.phase.is_green(target) {
                    self.timers.transition.stop_and_reset();
                    self.stage = ServeStage::Steady;
                    #[cfg(feature = "defmt")]
                    defmt::info!("🚦 steady green at intersection {}", target.number());
                }
                Ok(())
            }
            ServeStage::Steady => {
                if latch.request_pending(target.crosswalk()) {
                    // A pedestrian wants to cross this road; hand over.
                    self.enter_serve(other, now);
                    return Ok(());
                }
                if !latch.any_car_active() {
                    self.state = CoordinatorState::LongWait;
                    self.timers.long_wait.start(now);
                    #[cfg(feature = "defmt")]
                    defmt::info!("💤 no demand, idling");
                    return Ok(());
                }
                let here = latch.cars_at(target);
                let there = latch.cars_at(other);
                if here && there {
                    self.state = CoordinatorState::ShortWait;
                    self.timers.short_wait.start(now);
                    #[cfg(feature = "defmt")]
                    defmt::info!("⏳ contested demand, bounded hold");
                    return Ok(());
                }
                if there {
                    self.enter_serve(other, now);
                }
                Ok(())
            }
        }
    }

    fn poll_short_wait(&mut self, latch: &SensorLatch, now: Ticks) -> Result<(), B::Error> {
        let green = self.green_intersection();
        if latch.request_pending(green.crosswalk()) {
            self.timers.short_wait.stop_and_reset();
            self.enter_serve(green.other(), now);
            return Ok(());
        }
        if self.timers.short_wait.elapsed(now) >= self.timing.short_wait {
            self.timers.short_wait.stop_and_reset();
            self.enter_serve(green.other(), now);
        }
        Ok(())
    }

    fn poll_long_wait(&mut self, latch: &SensorLatch, now: Ticks) -> Result<(), B::Error> {
        let green = self.green_intersection();
        if latch.request_pending(green.crosswalk()) {
            self.timers.long_wait.stop_and_reset();
            self.enter_serve(green.other(), now);
            return Ok(());
        }
        if latch.any_car_active() {
            // Resume without touching the lamps; the serve logic decides
            // whether a handover is actually needed.
            self.timers.long_wait.stop_and_reset();
            self.state = CoordinatorState::Serve(green);
            self.stage = ServeStage::YieldOther;
            return Ok(());
        }
        if self.timers.long_wait.elapsed(now) >= self.timing.long_wait {
            self.timers.long_wait.stop_and_reset();
            self.enter_serve(green.other(), now);
        }
        Ok(())
    }

    /// Begin serving `target`, rebasing the transition timer
    fn enter_serve(&mut self, target: IntersectionId, now: Ticks) {
        self.state = CoordinatorState::Serve(target);
        self.stage = ServeStage::YieldOther;
        self.timers.transition.stop_and_reset();
        self.timers.transition.start(now);
        #[cfg(feature = "defmt")]
        defmt::info!("🔁 serving intersection {}", target.number());
    }

    /// The intersection currently holding (or closest to) green
    fn green_intersection(&self) -> IntersectionId {
        if self.phase.is_green(IntersectionId::One) {
            IntersectionId::One
        } else {
            IntersectionId::Two
        }
    }

    /// Start, toggle or retire the request-pending blink indicator
    fn service_blink(&mut self, latch: &SensorLatch, now: Ticks) -> Result<(), B::Error> {
        let waiting = CrosswalkId::BOTH
            .iter()
            .any(|cw| latch.request_pending(*cw) && self.walk.is_dont_walk(*cw));
        if waiting && !self.timers.blink.is_running() {
            self.timers.blink.start(now);
        }
        if self.timers.blink.is_running()
            && self.timers.blink.elapsed(now) >= self.timing.blink_period
        {
            self.walk
                .blink_tick(&mut self.bus, latch, &mut self.timers.blink)?;
            if self.timers.blink.is_running() {
                self.timers.blink.reset(now);
            }
        }
        Ok(())
    }

    /// Enforce the bound on how long walk may stay asserted against a green
    /// road
    fn service_walk_hold(&mut self, latch: &SensorLatch, now: Ticks) -> Result<(), B::Error> {
        if !self.timers.walk_hold.is_running()
            || self.timers.walk_hold.elapsed(now) < self.timing.walk_hold
        {
            return Ok(());
        }
        for id in IntersectionId::BOTH {
            let crosswalk = id.crosswalk();
            if self.walk.is_walk(crosswalk) && self.phase.is_green(id) {
                #[cfg(feature = "defmt")]
                defmt::warn!("⚠️ walk-hold expired on crosswalk {}", crosswalk.number());
                if let Some(notice) =
                    self.walk
                        .set_dont_walk(crosswalk.number(), &mut self.bus, latch)?
                {
                    self.display.notice(notice);
                }
            }
        }
        self.timers.walk_hold.stop_and_reset();
        Ok(())
    }
}
