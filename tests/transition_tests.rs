//! End-to-end tests for the transition protocol and the click adapter.

use parking_lot::Mutex;
use std::sync::Arc;
use switchboard::builder::Blueprint;
use switchboard::core::{Agent, Element, Owner, StateChange};
use switchboard::runtime::{Button, ClickBinding, Clickable, SharedRoot};
use switchboard::{BuildError, RootConfig, StateRoot};

type Journal = Arc<Mutex<Vec<String>>>;

/// Records every apply together with the slot it was handed.
struct Recorder {
    journal: Journal,
}

impl Agent<String> for Recorder {
    fn init(&self, owner: Owner<'_>, element: &Element<String>, slot: &mut String) {
        *slot = format!("{}#{}", owner.name(), element.slot_count());
    }

    fn apply(&self, root: &StateRoot<String>, element: &Element<String>, state: usize) {
        let slot = element.slot(state).cloned().unwrap_or_default();
        self.journal
            .lock()
            .push(format!("apply:{}:{}:{}", root.name(), state, slot));
    }
}

fn idle_active(config: RootConfig) -> (Journal, StateRoot<String>) {
    let journal: Journal = Arc::default();
    let mut blueprint: Blueprint<String> = Blueprint::new(config).agent(
        "record",
        Recorder {
            journal: Arc::clone(&journal),
        },
    );
    blueprint.add_named_state("Idle");
    blueprint.add_named_state("Active");
    blueprint.add_element("record", None).unwrap();

    for index in 0..blueprint.state_count() {
        let sink = Arc::clone(&journal);
        blueprint
            .state_mut(index)
            .unwrap()
            .on_phase(move |root, phase| {
                let name = root.state_names()[index].to_string();
                sink.lock().push(format!("{}:{}", phase, name));
            });
    }

    let root = blueprint.build().unwrap();
    let sink = Arc::clone(&journal);
    root.on_state_change().subscribe(move |change: &StateChange| {
        sink.lock().push(format!("notify:{:?}->{}", change.from, change.to));
    });
    (journal, root)
}

#[test]
fn idle_to_active_runs_the_full_protocol_in_order() {
    let (journal, mut root) = idle_active(RootConfig::named("Door"));

    assert!(root.set_current_state(1, true));

    assert_eq!(root.current_index(), 1);
    assert_eq!(root.current_state_name(), Some("Active"));
    assert_eq!(
        *journal.lock(),
        vec![
            "Exit:Idle".to_string(),
            "apply:Door:1:Door#1".to_string(),
            "Enter:Active".to_string(),
            "notify:Some(0)->1".to_string(),
        ]
    );
}

#[test]
fn reapplying_current_state_skips_exit() {
    let (journal, mut root) = idle_active(RootConfig::named("Door"));

    assert!(root.set_current_state(0, false));

    assert_eq!(
        *journal.lock(),
        vec!["apply:Door:0:Door#0".to_string(), "Enter:Idle".to_string()]
    );
}

#[test]
fn out_of_range_request_does_nothing() {
    let (journal, mut root) = idle_active(RootConfig::named("Door"));

    assert!(!root.set_current_state(2, true));

    assert_eq!(root.current_index(), 0);
    assert!(journal.lock().is_empty());
}

#[test]
fn name_path_applies_without_hooks() {
    let (journal, mut root) = idle_active(RootConfig::named("Door"));

    assert!(root.set_current_state_by_name("Active", true));
    assert!(!root.set_current_state_by_name("Missing", true));

    assert_eq!(root.current_index(), 1);
    assert_eq!(
        *journal.lock(),
        vec![
            "apply:Door:1:Door#1".to_string(),
            "notify:Some(0)->1".to_string(),
        ]
    );
}

#[test]
fn scoped_elements_are_never_applied() {
    let journal: Journal = Arc::default();
    let mut blueprint: Blueprint<String> = Blueprint::named("Card")
        .agent(
            "record",
            Recorder {
                journal: Arc::clone(&journal),
            },
        )
        .with_states(["Front", "Back"]);
    blueprint.add_element("record", Some(1)).unwrap();

    let mut root = blueprint.build().unwrap();
    assert!(root.set_current_state(1, true));

    assert!(journal.lock().is_empty());
    assert_eq!(root.states()[1].elements().len(), 1);
}

#[test]
fn settings_from_json_drive_the_root() {
    let config = RootConfig::from_json(
        r#"{ "name": "Toggle", "click_switches_state": true, "set_on_start": true, "initial_state": 1 }"#,
    )
    .unwrap();
    let (journal, mut root) = idle_active(config);

    assert_eq!(root.current_index(), 1);
    assert!(root.is_smooth());
    assert!(root.start());
    assert_eq!(
        *journal.lock(),
        vec![
            "apply:Toggle:1:Toggle#1".to_string(),
            "Enter:Active".to_string(),
            "notify:Some(1)->1".to_string(),
        ]
    );

    journal.lock().clear();
    root.click();
    assert_eq!(root.current_state_name(), Some("Idle"));
    assert_eq!(journal.lock().first().map(String::as_str), Some("Exit:Active"));
}

#[test]
fn invalid_initial_state_fails_to_build() {
    let blueprint: Blueprint<String> = Blueprint::new(RootConfig {
        initial_state: 3,
        ..RootConfig::named("Broken")
    })
    .with_states(["Only"]);

    assert!(matches!(
        blueprint.build(),
        Err(BuildError::InvalidLayout { ref violations }) if violations.len() == 1
    ));
}

#[test]
fn button_clicks_cycle_a_shared_root() {
    let config = RootConfig {
        click_switches_state: true,
        ..RootConfig::named("Light")
    };
    let (journal, root) = idle_active(config);
    let root = SharedRoot::new(root);
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&clicks);
    root.read(|root| {
        root.on_click()
            .subscribe(move |click| sink.lock().push((click.switched, click.current)))
    });

    let button = Button::new();
    let binding = ClickBinding::with_control(root.clone(), Arc::new(button.clone()));

    button.click();
    button.click();
    button.click();

    assert_eq!(*clicks.lock(), vec![(true, 1), (true, 0), (true, 1)]);
    assert_eq!(
        journal
            .lock()
            .iter()
            .filter(|entry| entry.starts_with("notify"))
            .count(),
        3
    );

    drop(binding);
    assert_eq!(button.listener_count(), 0);
    button.click();
    assert_eq!(clicks.lock().len(), 3);
}

#[test]
fn rebinding_moves_the_listener() {
    let (_, root) = idle_active(RootConfig::named("Pad"));
    let root = SharedRoot::new(root);
    let first = Button::new();
    let second = Button::new();
    let mut binding = ClickBinding::new(root.clone());

    binding.bind(Some(Arc::new(first.clone()) as Arc<dyn Clickable>));
    binding.bind(Some(Arc::new(second.clone()) as Arc<dyn Clickable>));

    assert_eq!(first.listener_count(), 0);
    assert_eq!(second.listener_count(), 1);

    binding.bind(None);
    assert!(!binding.is_bound());
    assert_eq!(second.listener_count(), 0);
}

#[test]
fn transition_chained_from_a_subscriber_completes_on_a_worker_thread() {
    let mut blueprint: Blueprint<()> = Blueprint::named("Stairs").click_switches_state(true);
    for _ in 0..3 {
        blueprint.add_state();
    }
    let root = SharedRoot::new(blueprint.build().unwrap());
    let handle = root.downgrade();
    root.read(|root| {
        root.on_state_change().subscribe(move |change| {
            if change.to == 1 {
                handle.request(|root| {
                    root.set_state(2);
                });
            }
        })
    });
    let button = Button::new();
    let _binding = ClickBinding::with_control(root.clone(), Arc::new(button.clone()));

    let (done, finished) = std::sync::mpsc::channel();
    let clicker = button.clone();
    std::thread::spawn(move || {
        clicker.click();
        let _ = done.send(());
    });

    finished
        .recv_timeout(std::time::Duration::from_secs(5))
        .expect("click never returned");
    assert_eq!(root.read(|root| root.current_index()), Some(2));
}
