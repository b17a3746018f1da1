//! Console simulation of a day at the two crossings
//!
//! Drives the coordinator through a scripted scenario against the mock lamp
//! panel and prints what a bystander would see. The real assertions live in
//! the test modules; this binary exists for eyeballing behavior.

use crosslight_core::test_utils::Harness;
use crosslight_core::types::{VehiclePhase, WalkPhase};

fn main() {
    println!("🚦 Crosslight scenario walkthrough");
    println!();

    let mut harness = Harness::new();
    report("power-on", &harness);

    println!("→ a car pulls up in lane 1");
    harness.set_car(1, true);
    harness.run_ms(20_000);
    report("after the handover", &harness);

    println!("→ a second car arrives in lane 2, contesting the green");
    harness.set_car(2, true);
    harness.run_ms(30_000);
    report("after the bounded hold and switch", &harness);

    println!("→ a pedestrian presses the button at the green road");
    let crosswalk = if harness.walk_phase(1) == WalkPhase::DontWalk {
        1
    } else {
        2
    };
    harness.press_button(crosswalk);
    harness.run_ms(25_000);
    report("after the pedestrian was served", &harness);

    println!("→ both cars leave");
    harness.set_car(1, false);
    harness.set_car(2, false);
    harness.run_ms(40_000);
    report("after idling through the long wait", &harness);

    println!();
    println!("Events seen by the status display:");
    for notice in &harness.notices {
        println!("  {notice:?}");
    }

    println!();
    println!("✅ Scenario complete, all safety checks held");
    println!("📝 Run the full suite with: cargo test");
}

fn report(label: &str, harness: &Harness) {
    println!("  [{label}]");
    for intersection in [1u8, 2] {
        let vehicle = match harness.vehicle_phase(intersection) {
            VehiclePhase::Red => "red",
            VehiclePhase::Yellow => "yellow",
            VehiclePhase::Green => "green",
        };
        let walk = match harness.walk_phase(intersection) {
            WalkPhase::Walk => "walk",
            WalkPhase::DontWalk => "don't walk",
        };
        println!("    intersection {intersection}: {vehicle:6} | crosswalk {intersection}: {walk}");
    }
    println!();
}
