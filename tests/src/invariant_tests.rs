//! Property tests: safety must hold under arbitrary demand
//!
//! The harness asserts on every poll that the two intersections are never
//! green together and that walk is only ever shown over a red road, so any
//! violation surfaces as a panic inside `run_ms`.

use crosslight_core::test_utils::Harness;
use crosslight_core::timers::ticks_from_ms;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Car(u8, bool),
    Press(u8),
    Run(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u8..=4, any::<bool>()).prop_map(|(lane, present)| Op::Car(lane, present)),
        (1u8..=2).prop_map(Op::Press),
        (5u16..=2_000).prop_map(Op::Run),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn safety_holds_under_arbitrary_demand(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let mut harness = Harness::new();
        for op in ops {
            match op {
                Op::Car(lane, present) => harness.set_car(lane, present),
                Op::Press(crosswalk) => {
                    harness.press_button(crosswalk);
                }
                Op::Run(ms) => harness.run_ms(ms as u64),
            }
        }
        // Let whatever is in flight settle, still under invariant checks.
        harness.run_ms(30_000);

        // Any yellow interval that completed lasted the full dwell.
        for intersection in [1, 2] {
            for dwell in harness.yellow_dwells(intersection) {
                prop_assert!(dwell >= ticks_from_ms(3_000));
            }
        }
    }

    #[test]
    fn a_latched_request_is_always_served(press_delay_ms in 0u64..10_000) {
        let mut harness = Harness::new();
        harness.set_car(1, true);
        harness.set_car(2, true);
        harness.run_ms(press_delay_ms);

        // Press whichever button is currently gated open.
        let pressed = if harness.press_button(1) {
            1
        } else if harness.press_button(2) {
            2
        } else {
            return Ok(());
        };

        // Worst case is a full wait plus two handovers.
        harness.run_ms(60_000);
        let crosswalk = crosslight_core::types::CrosswalkId::from_number(pressed).unwrap();
        prop_assert!(!harness.latch.request_pending(crosswalk));
    }
}

#[test]
fn sustained_contention_never_wedges() {
    let mut harness = Harness::new();
    harness.set_car(1, true);
    harness.set_car(2, true);
    harness.set_car(3, true);
    harness.set_car(4, true);

    // Ten minutes of contested demand with periodic button presses; the
    // per-poll checks inside run_ms do the real work here.
    for round in 0..60 {
        harness.press_button(1 + (round % 2) as u8);
        harness.run_ms(10_000);
    }

    // Both directions kept cycling the whole time.
    assert!(harness.yellow_dwells(1).len() >= 10);
    assert!(harness.yellow_dwells(2).len() >= 10);
}
