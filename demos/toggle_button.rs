//! Toggle Button
//!
//! A root bound to a clickable control. Each click advances the state and
//! wraps back to the first one past the end.
//!
//! Key concepts:
//! - Settings loaded from JSON
//! - Sharing a root between its owner and a control
//! - Binding, rebinding and unbinding a control
//!
//! Run with: cargo run --example toggle_button

use std::sync::Arc;
use switchboard::builder::Blueprint;
use switchboard::core::{Agent, Element, Owner};
use switchboard::runtime::{Button, ClickBinding, SharedRoot};
use switchboard::{RootConfig, StateRoot};
use tracing_subscriber::EnvFilter;

struct Label;

impl Agent<String> for Label {
    fn init(&self, owner: Owner<'_>, _element: &Element<String>, slot: &mut String) {
        *slot = owner.name().to_string();
    }

    fn apply(&self, _root: &StateRoot<String>, element: &Element<String>, state: usize) {
        if let Some(text) = element.slot(state) {
            println!("  label: {}", text);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Toggle Button ===\n");

    let config =
        RootConfig::from_json(r#"{ "name": "Mute", "click_switches_state": true }"#).unwrap();
    let mut blueprint: Blueprint<String> = Blueprint::new(config)
        .agent("label", Label)
        .with_states(["Off", "On"]);
    blueprint.add_element("label", None).unwrap();
    *blueprint.element_mut(0).unwrap().slot_mut(1).unwrap() = "Muted".to_string();

    let root = SharedRoot::new(blueprint.build().unwrap());
    root.read(|root| {
        root.on_click().subscribe(|click| {
            println!("  click (switched: {}, now at {})", click.switched, click.current);
        })
    });

    let button = Button::new();
    let mut binding = ClickBinding::with_control(root.clone(), Arc::new(button.clone()));

    println!("Clicking three times:");
    for _ in 0..3 {
        button.click();
    }

    println!("\nMoving the binding to a second button");
    let other = Button::new();
    binding.bind(Some(Arc::new(other.clone())));
    button.click();
    other.click();
    println!("  first button listeners: {}", button.listener_count());

    binding.unbind();
    other.click();
    let last = root.read(|root| root.current_state_name().map(str::to_string));
    println!("\nFinal state: {:?}", last.flatten());
}
