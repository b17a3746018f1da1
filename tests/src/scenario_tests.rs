//! End-to-end scenarios against the simulation harness

use crosslight_core::lights::mask;
use crosslight_core::test_utils::Harness;
use crosslight_core::timers::ticks_from_ms;
use crosslight_core::types::{
    CoordinatorState, CrosswalkId, IntersectionId, Lane, Notice, VehiclePhase, WalkPhase,
};
use rstest::rstest;

#[test]
fn idle_controller_alternates_between_intersections() {
    let mut harness = Harness::new();

    // With no demand at all the idle hold is bounded; intersection 1 gets
    // its turn well inside 35 s.
    harness.run_ms(35_000);
    assert_eq!(harness.vehicle_phase(1), VehiclePhase::Green);
    assert_eq!(harness.vehicle_phase(2), VehiclePhase::Red);
    assert_eq!(harness.walk_phase(2), WalkPhase::Walk);
    assert!(harness.lamp_lit(mask::TL1_GREEN | mask::TL3_GREEN | mask::PL2_GREEN));

    // And swings back again on the next idle expiry.
    harness.run_ms(35_000);
    assert_eq!(harness.vehicle_phase(2), VehiclePhase::Green);
    assert_eq!(harness.walk_phase(1), WalkPhase::Walk);
}

#[test]
fn every_yellow_interval_lasts_the_full_dwell() {
    let mut harness = Harness::new();
    harness.set_car(1, true);
    harness.set_car(2, true);
    harness.run_ms(120_000);

    for intersection in [1, 2] {
        let dwells = harness.yellow_dwells(intersection);
        assert!(!dwells.is_empty(), "intersection {intersection} never cycled");
        for dwell in dwells {
            assert!(dwell >= ticks_from_ms(3_000));
        }
    }
}

#[test]
fn pedestrian_press_blinks_then_wins_the_crossing() {
    let mut harness = Harness::new();

    assert!(harness.press_button(2));
    assert!(harness
        .notices
        .contains(&Notice::PedestrianWaiting(CrosswalkId::Two)));

    // The indicator starts blinking within two periods of the press.
    harness.run_ms(250);
    assert_eq!(harness.coordinator.blink_on(2), Some(true));
    assert!(harness.lamp_lit(mask::PL2_BLUE));

    // One full handover later the walk is granted, the blink is dark and
    // the request has retired.
    harness.run_ms(20_000);
    assert_eq!(harness.vehicle_phase(2), VehiclePhase::Red);
    assert_eq!(harness.walk_phase(2), WalkPhase::Walk);
    assert!(!harness.lamp_lit(mask::PL2_BLUE));
    assert!(!harness.latch.request_pending(CrosswalkId::Two));
    assert!(harness.notices.contains(&Notice::WalkOn(CrosswalkId::Two)));

    // Pressing during walk does nothing.
    assert!(!harness.press_button(2));
}

#[test]
fn repeated_presses_collapse_into_one_service() {
    let mut harness = Harness::new();

    assert!(harness.press_button(2));
    assert!(!harness.press_button(2));
    harness.run_ms(1_000);
    assert!(!harness.press_button(2));

    let waiting = harness
        .notices
        .iter()
        .filter(|n| **n == Notice::PedestrianWaiting(CrosswalkId::Two))
        .count();
    assert_eq!(waiting, 1);

    harness.run_ms(20_000);
    assert_eq!(harness.walk_phase(2), WalkPhase::Walk);
}

#[test]
fn contested_demand_switches_after_the_bounded_hold() {
    let mut harness = Harness::new();
    harness.set_car(2, true);
    harness.run_ms(100);
    assert_eq!(
        harness.coordinator.state(),
        CoordinatorState::Serve(IntersectionId::Two)
    );

    harness.set_car(3, true);
    harness.run_ms(100);
    assert_eq!(harness.coordinator.state(), CoordinatorState::ShortWait);

    // Intersection 2 keeps its green through the hold, then yields.
    harness.run_ms(4_000);
    assert_eq!(harness.vehicle_phase(2), VehiclePhase::Green);
    harness.run_ms(20_000);
    assert_eq!(harness.vehicle_phase(1), VehiclePhase::Green);
    assert_eq!(harness.vehicle_phase(2), VehiclePhase::Red);
}

#[test]
fn car_on_the_green_side_resumes_idle_without_lamp_writes() {
    let mut harness = Harness::new();
    harness.run_ms(1_000);
    assert_eq!(harness.coordinator.state(), CoordinatorState::LongWait);
    let before = harness.coordinator.bus().mask();

    harness.set_car(4, true);
    harness.run_ms(500);
    assert_eq!(
        harness.coordinator.state(),
        CoordinatorState::Serve(IntersectionId::Two)
    );
    assert_eq!(harness.coordinator.bus().mask(), before);
}

#[test]
fn opposing_car_is_served_and_crosswalks_swap() {
    let mut harness = Harness::new();
    harness.set_car(1, true);
    harness.run_ms(20_000);

    assert_eq!(harness.vehicle_phase(1), VehiclePhase::Green);
    assert_eq!(harness.walk_phase(1), WalkPhase::DontWalk);
    assert_eq!(harness.walk_phase(2), WalkPhase::Walk);
    assert!(harness.notices.contains(&Notice::WalkOff(CrosswalkId::One)));
    assert!(harness.notices.contains(&Notice::WalkOn(CrosswalkId::Two)));
    assert!(harness.notices.contains(&Notice::CarActive(Lane::L1)));
}

#[test]
fn both_lanes_of_an_intersection_count_as_demand() {
    let mut harness = Harness::new();
    // Lane 3 feeds intersection 1 just like lane 1 does.
    harness.set_car(3, true);
    harness.run_ms(20_000);
    assert_eq!(harness.vehicle_phase(1), VehiclePhase::Green);

    harness.set_car(3, false);
    assert!(harness.notices.contains(&Notice::CarInactive(Lane::L3)));
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(255)]
fn out_of_range_buttons_are_ignored(#[case] crosswalk: u8) {
    let mut harness = Harness::new();
    assert!(!harness.press_button(crosswalk));
    assert!(harness.notices.is_empty());
}

#[rstest]
#[case(0)]
#[case(5)]
fn out_of_range_lanes_are_ignored(#[case] lane: u8) {
    let mut harness = Harness::new();
    harness.set_car(lane, true);
    harness.run_ms(1_000);
    // No demand registered anywhere, so the controller idles.
    assert_eq!(harness.coordinator.state(), CoordinatorState::LongWait);
}
