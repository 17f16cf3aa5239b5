//! Traffic Light
//!
//! A three-state root that loops forever. One element carries the lamp
//! color for each state; the agent prints it when the state is applied.
//!
//! Key concepts:
//! - Authoring states and slots with a blueprint
//! - Looping navigation
//! - Enter/exit hooks
//!
//! Run with: cargo run --example traffic_light

use switchboard::builder::Blueprint;
use switchboard::core::{Agent, Element, Phase};
use switchboard::StateRoot;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default)]
struct Lamp {
    color: &'static str,
    seconds: u32,
}

struct LampAgent;

impl Agent<Lamp> for LampAgent {
    fn apply(&self, root: &StateRoot<Lamp>, element: &Element<Lamp>, state: usize) {
        if let Some(lamp) = element.slot(state) {
            println!(
                "  [{}] lamp {} for {}s",
                root.name(),
                lamp.color,
                lamp.seconds
            );
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light ===\n");

    let mut blueprint: Blueprint<Lamp> = Blueprint::named("Crossing")
        .agent("lamp", LampAgent)
        .with_states(["Red", "Green", "Yellow"]);
    blueprint.add_element("lamp", None).unwrap();

    let lamps = [("red", 30), ("green", 25), ("yellow", 5)];
    let element = blueprint.element_mut(0).unwrap();
    for (state, (color, seconds)) in lamps.into_iter().enumerate() {
        *element.slot_mut(state).unwrap() = Lamp { color, seconds };
    }

    blueprint
        .state_mut(0)
        .unwrap()
        .on_phase(|_root, phase| match phase {
            Phase::Enter => println!("  pedestrians may cross"),
            Phase::Exit => println!("  pedestrians must wait"),
        });

    let mut root = blueprint.build().unwrap();
    root.on_state_change().subscribe(|change| {
        println!("  -> now {} ({:?} -> {})\n", change.state_name, change.from, change.to);
    });

    root.set_state(0);
    for _ in 0..4 {
        root.set_next_state_with_loop(true);
    }

    println!("Final state: {:?}", root.current_state_name());
}
