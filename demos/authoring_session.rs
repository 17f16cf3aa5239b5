//! Authoring Session
//!
//! Edits a blueprint the way an editor would: adding, swapping and removing
//! states while element slots follow along, then validating and building.
//!
//! Run with: cargo run --example authoring_session

use switchboard::builder::{Blueprint, LayoutViolation};
use switchboard::core::{Agent, Element};
use switchboard::{BuildError, RootConfig, StateRoot};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default)]
struct Position {
    x: f32,
    y: f32,
}

struct Mover;

impl Agent<Position> for Mover {
    fn apply(&self, root: &StateRoot<Position>, element: &Element<Position>, state: usize) {
        if let Some(position) = element.slot(state) {
            let mode = if root.is_smooth() { "tween" } else { "snap" };
            println!("  {} to ({}, {})", mode, position.x, position.y);
        }
    }
}

fn print_layout(blueprint: &Blueprint<Position>) {
    println!("  states: {:?}", blueprint.state_names());
    for element in blueprint.elements() {
        let xs: Vec<f32> = element.slots().iter().map(|p| p.x).collect();
        println!("  '{}' slots x: {:?}", element.kind(), xs);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Authoring Session ===\n");

    let mut blueprint: Blueprint<Position> =
        Blueprint::new(RootConfig::named("Drawer")).agent("move", Mover);
    blueprint.add_named_state("Closed");
    blueprint.add_element("move", None).unwrap();
    blueprint.add_named_state("Peek");
    blueprint.add_named_state("Open");

    let element = blueprint.element_mut(0).unwrap();
    for (state, x) in [0.0, 40.0, 200.0].into_iter().enumerate() {
        *element.slot_mut(state).unwrap() = Position { x, y: 0.0 };
    }
    println!("After adding:");
    print_layout(&blueprint);

    blueprint.swap_state(1, 2).unwrap();
    println!("\nAfter swapping 1 and 2:");
    print_layout(&blueprint);

    let removed = blueprint.remove_state(2).unwrap();
    println!("\nRemoved '{}':", removed.name());
    print_layout(&blueprint);

    match blueprint.remove_state(9) {
        Ok(_) => println!("\nunexpected removal"),
        Err(error) => println!("\nRejected: {}", error),
    }

    let broken: Blueprint<Position> = Blueprint::named("Broken")
        .initial_state(4)
        .with_states(["Only"]);
    if let Err(BuildError::InvalidLayout { violations }) = broken.build() {
        for violation in &violations {
            if let LayoutViolation::InitialStateOutOfRange { .. } = violation {
                println!("Build refused: {}", violation);
            }
        }
    }

    let mut root = blueprint.smooth(false).build().unwrap();
    println!("\nRunning '{}':", root.name());
    root.set_state(1);
    root.set_state(0);
}
