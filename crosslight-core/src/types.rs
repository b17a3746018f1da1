//! Core data types for the traffic signal controller

use crate::timers::{ticks_from_ms, Ticks};

/// One of the two independently signalled vehicle crossings
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntersectionId {
    One,
    Two,
}

impl IntersectionId {
    pub const BOTH: [IntersectionId; 2] = [IntersectionId::One, IntersectionId::Two];

    /// Parse a wire-level identifier; anything outside {1, 2} is invalid
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(IntersectionId::One),
            2 => Some(IntersectionId::Two),
            _ => None,
        }
    }

    pub const fn number(&self) -> u8 {
        match self {
            IntersectionId::One => 1,
            IntersectionId::Two => 2,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            IntersectionId::One => 0,
            IntersectionId::Two => 1,
        }
    }

    /// The opposite intersection
    pub const fn other(&self) -> Self {
        match self {
            IntersectionId::One => IntersectionId::Two,
            IntersectionId::Two => IntersectionId::One,
        }
    }

    /// The crosswalk that crosses this intersection's road
    pub const fn crosswalk(&self) -> CrosswalkId {
        match self {
            IntersectionId::One => CrosswalkId::One,
            IntersectionId::Two => CrosswalkId::Two,
        }
    }
}

/// Pedestrian crossing, paired 1:1 with the intersection whose road it spans
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrosswalkId {
    One,
    Two,
}

impl CrosswalkId {
    pub const BOTH: [CrosswalkId; 2] = [CrosswalkId::One, CrosswalkId::Two];

    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(CrosswalkId::One),
            2 => Some(CrosswalkId::Two),
            _ => None,
        }
    }

    pub const fn number(&self) -> u8 {
        match self {
            CrosswalkId::One => 1,
            CrosswalkId::Two => 2,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            CrosswalkId::One => 0,
            CrosswalkId::Two => 1,
        }
    }

    /// The intersection this crosswalk spans; walking is legal only while
    /// that intersection's vehicle phase is red
    pub const fn intersection(&self) -> IntersectionId {
        match self {
            CrosswalkId::One => IntersectionId::One,
            CrosswalkId::Two => IntersectionId::Two,
        }
    }
}

/// Vehicle presence lane; two redundant sensor lanes feed each intersection
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lane {
    L1,
    L2,
    L3,
    L4,
}

impl Lane {
    pub const ALL: [Lane; 4] = [Lane::L1, Lane::L2, Lane::L3, Lane::L4];

    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Lane::L1),
            2 => Some(Lane::L2),
            3 => Some(Lane::L3),
            4 => Some(Lane::L4),
            _ => None,
        }
    }

    pub const fn number(&self) -> u8 {
        match self {
            Lane::L1 => 1,
            Lane::L2 => 2,
            Lane::L3 => 3,
            Lane::L4 => 4,
        }
    }

    pub const fn index(&self) -> usize {
        (self.number() - 1) as usize
    }

    /// Static lane-to-intersection wiring: odd lanes feed intersection 1,
    /// even lanes feed intersection 2
    pub const fn intersection(&self) -> IntersectionId {
        match self {
            Lane::L1 | Lane::L3 => IntersectionId::One,
            Lane::L2 | Lane::L4 => IntersectionId::Two,
        }
    }
}

/// Steady vehicle light phase; Yellow is transient and only ever observed
/// mid-transition
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VehiclePhase {
    Red,
    Yellow,
    Green,
}

impl VehiclePhase {
    pub const fn is_red(&self) -> bool {
        matches!(self, VehiclePhase::Red)
    }

    pub const fn is_green(&self) -> bool {
        matches!(self, VehiclePhase::Green)
    }
}

/// Pedestrian light phase
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WalkPhase {
    DontWalk,
    Walk,
}

/// One signalled vehicle crossing
#[derive(Copy, Clone, Debug)]
pub struct Intersection {
    id: IntersectionId,
    phase: VehiclePhase,
}

impl Intersection {
    pub const fn new(id: IntersectionId, phase: VehiclePhase) -> Self {
        Self { id, phase }
    }

    pub const fn id(&self) -> IntersectionId {
        self.id
    }

    pub const fn phase(&self) -> VehiclePhase {
        self.phase
    }

    // Phase is written only by the phase controller.
    pub(crate) fn set_phase(&mut self, phase: VehiclePhase) {
        self.phase = phase;
    }
}

/// One pedestrian crossing with its request-pending blink indicator
#[derive(Copy, Clone, Debug)]
pub struct Crosswalk {
    id: CrosswalkId,
    walk: WalkPhase,
    blink_on: bool,
}

impl Crosswalk {
    pub const fn new(id: CrosswalkId, walk: WalkPhase) -> Self {
        Self {
            id,
            walk,
            blink_on: false,
        }
    }

    pub const fn id(&self) -> CrosswalkId {
        self.id
    }

    pub const fn walk(&self) -> WalkPhase {
        self.walk
    }

    /// Blink indicator state; meaningful only while a request is pending
    /// and the walk phase is DontWalk
    pub const fn blink_on(&self) -> bool {
        self.blink_on
    }

    pub(crate) fn set_walk(&mut self, walk: WalkPhase) {
        self.walk = walk;
    }

    pub(crate) fn set_blink(&mut self, on: bool) {
        self.blink_on = on;
    }
}

/// Top-level coordinator state; exactly one value is active at any instant
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoordinatorState {
    /// Actively serving (or transitioning toward) one intersection
    Serve(IntersectionId),
    /// Both directions have waiting traffic; bounded tie-break hold
    ShortWait,
    /// No vehicle demand anywhere; bounded idle hold
    LongWait,
}

/// Sub-step within a `Serve` state, advanced one step per poll
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServeStage {
    /// Stop the other intersection, then hand the crosswalks over
    YieldOther,
    /// Bring the target intersection up to green
    TurnGreen,
    /// Steady green; watch demand and pedestrian requests
    Steady,
}

/// Status display event, rendered as human-readable text by the sink
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    CarActive(Lane),
    CarInactive(Lane),
    PedestrianWaiting(CrosswalkId),
    WalkOn(CrosswalkId),
    WalkOff(CrosswalkId),
}

/// Timing plan for every dwell and wait threshold, in 0.5 ms ticks
///
/// The short and long wait thresholds are deliberately smaller than the
/// bounds they enforce: a full intersection handover takes roughly 15 s of
/// transition time on top of the wait itself, so 5 s / 15 s thresholds yield
/// the ~20 s / ~30 s totals observed at the lamps.
#[derive(Copy, Clone, Debug)]
pub struct TimingConfig {
    /// Green (or red) dwell before yellow is shown during a transition
    pub clear_dwell: Ticks,
    /// Minimum yellow dwell between red and green in either direction
    pub yellow_dwell: Ticks,
    /// Extra delay after the yielding intersection reaches red, letting its
    /// crosswalk clear before walk phases are handed over
    pub pedestrian_release: Ticks,
    /// Tie-break hold while both directions have waiting traffic
    pub short_wait: Ticks,
    /// Idle hold while no vehicle demand exists anywhere
    pub long_wait: Ticks,
    /// Blink indicator toggle period
    pub blink_period: Ticks,
    /// Safety backstop bounding how long walk may stay asserted after the
    /// paired intersection turns green
    pub walk_hold: Ticks,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clear_dwell: ticks_from_ms(2_000),
            yellow_dwell: ticks_from_ms(3_000),
            pedestrian_release: ticks_from_ms(5_000),
            short_wait: ticks_from_ms(5_000),
            long_wait: ticks_from_ms(15_000),
            blink_period: ticks_from_ms(125),
            walk_hold: ticks_from_ms(15_000),
        }
    }
}

impl TimingConfig {
    /// Check the plan for values that would wedge or endanger the state
    /// machine
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.yellow_dwell == 0 {
            return Err("yellow dwell must be non-zero");
        }
        if self.blink_period == 0 {
            return Err("blink period must be non-zero");
        }
        if self.short_wait >= self.long_wait {
            return Err("short wait must be below long wait");
        }
        if self.pedestrian_release < self.clear_dwell {
            return Err("pedestrian release must cover the clear dwell");
        }
        Ok(())
    }
}
