//! Host-based test suite for the crosslight signal controller
//!
//! Scenario tests drive the full coordinator through the simulation harness,
//! property tests hammer it with arbitrary demand, and the HAL tests check
//! the shift-register transport against mock peripherals.

#[cfg(test)]
mod scenario_tests;

#[cfg(test)]
mod invariant_tests;
