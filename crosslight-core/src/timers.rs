//! Soft countdown timers over an abstract monotonic tick source
//!
//! The reference hardware clocks every timer at 2 kHz (one tick per 0.5 ms).
//! The core never touches a timer peripheral directly; it is handed a tick
//! count on every poll and measures elapsed time against recorded bases,
//! which is what lets the whole state machine run against a simulated clock.

/// Monotonic tick count, 0.5 ms per tick
pub type Ticks = u64;

/// Logical timer resolution
pub const TICK_HZ: u64 = 2_000;

/// Convert milliseconds to ticks at the fixed 2 kHz resolution
pub const fn ticks_from_ms(ms: u64) -> Ticks {
    ms * TICK_HZ / 1_000
}

/// Source of the monotonic tick count
pub trait TickSource {
    fn now_ticks(&self) -> Ticks;
}

/// One start/stop/reset/query countdown timer
///
/// `elapsed` reads zero while stopped. Starting an already-running timer is
/// a no-op; use [`SoftTimer::reset`] to rebase a running timer.
#[derive(Copy, Clone, Debug, Default)]
pub struct SoftTimer {
    running: bool,
    base: Ticks,
}

impl SoftTimer {
    pub const fn new() -> Self {
        Self {
            running: false,
            base: 0,
        }
    }

    pub fn start(&mut self, now: Ticks) {
        if !self.running {
            self.base = now;
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Rebase the count to zero without changing the run state
    pub fn reset(&mut self, now: Ticks) {
        self.base = now;
    }

    /// Stop and clear in one call
    pub fn stop_and_reset(&mut self) {
        self.running = false;
        self.base = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks elapsed since start; zero while stopped
    pub fn elapsed(&self, now: Ticks) -> Ticks {
        if self.running {
            now.saturating_sub(self.base)
        } else {
            0
        }
    }
}

/// The five timer roles the coordinator allocates
#[derive(Debug, Default)]
pub struct TimerBank {
    /// Periodic toggle for the request-pending blink indicator
    pub blink: SoftTimer,
    /// Staged red/yellow/green dwell measurement
    pub transition: SoftTimer,
    /// Tie-break hold while both directions have demand
    pub short_wait: SoftTimer,
    /// Idle hold while no demand exists anywhere
    pub long_wait: SoftTimer,
    /// Walk-phase safety backstop
    pub walk_hold: SoftTimer,
}

impl TimerBank {
    pub const fn new() -> Self {
        Self {
            blink: SoftTimer::new(),
            transition: SoftTimer::new(),
            short_wait: SoftTimer::new(),
            long_wait: SoftTimer::new(),
            walk_hold: SoftTimer::new(),
        }
    }
}

/// Tick source backed by `embassy_time::Instant`
#[cfg(feature = "embassy-time")]
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl TickSource for EmbassyClock {
    fn now_ticks(&self) -> Ticks {
        // 0.5 ms per logical tick regardless of the embassy tick rate.
        embassy_time::Instant::now().as_micros() / 500
    }
}
