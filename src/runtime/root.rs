//! The state controller.

use crate::config::RootConfig;
use crate::core::{Click, Element, EventHub, Phase, StateChange, StateConfig};
use chrono::Utc;
use std::fmt;
use tracing::{debug, error, trace};
use uuid::Uuid;

/// A validated, structurally frozen state root.
///
/// Produced by [`Blueprint::build`](crate::builder::Blueprint::build). The
/// state list and every element's slot array are fixed for the lifetime of
/// the root; only the current index and the owner-level flags change.
///
/// Runtime operations report failure through their `bool` result and never
/// panic. Hooks, agents and subscribers only ever see `&StateRoot`, so they
/// cannot start another transition on it directly. To chain a transition
/// from inside dispatch, wrap the root in a
/// [`SharedRoot`](crate::runtime::SharedRoot) and queue it through a
/// [`WeakRoot`](crate::runtime::WeakRoot).
pub struct StateRoot<D> {
    id: Uuid,
    config: RootConfig,
    states: Vec<StateConfig<D>>,
    elements: Vec<Element<D>>,
    current: usize,
    state_changed: EventHub<StateChange>,
    clicked: EventHub<Click>,
}

impl<D> StateRoot<D> {
    pub(crate) fn from_parts(
        id: Uuid,
        config: RootConfig,
        states: Vec<StateConfig<D>>,
        elements: Vec<Element<D>>,
    ) -> Self {
        let current = config.initial_state;
        Self {
            id,
            config,
            states,
            elements,
            current,
            state_changed: EventHub::new(),
            clicked: EventHub::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    /// Hint for agents: animate rather than snap.
    pub fn is_smooth(&self) -> bool {
        self.config.smooth
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.config.smooth = smooth;
    }

    pub fn click_switches_state(&self) -> bool {
        self.config.click_switches_state
    }

    pub fn set_click_switches_state(&mut self, enabled: bool) {
        self.config.click_switches_state = enabled;
    }

    pub fn states(&self) -> &[StateConfig<D>] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&StateConfig<D>> {
        self.states.get(index)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Top-level elements, applied on every transition.
    pub fn elements(&self) -> &[Element<D>] {
        &self.elements
    }

    /// Display names of the states, in order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(StateConfig::name).collect()
    }

    /// The raw current index. Meaningless while the root has no states.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_state(&self) -> Option<&StateConfig<D>> {
        self.states.get(self.current)
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current_state().map(StateConfig::name)
    }

    pub fn has_state(&self, index: usize) -> bool {
        index < self.states.len()
    }

    /// Published after transitions requested with `notify`.
    ///
    /// Subscribers run in the middle of the transition. One that wants to
    /// move the root again should go through
    /// [`WeakRoot::request`](crate::runtime::WeakRoot::request), which runs
    /// the change after this one completes.
    pub fn on_state_change(&self) -> &EventHub<StateChange> {
        &self.state_changed
    }

    /// Published on every click.
    pub fn on_click(&self) -> &EventHub<Click> {
        &self.clicked
    }

    /// Move to `index`.
    ///
    /// Runs the old state's exit hook (only when the index changes and the
    /// old index is valid), applies every top-level element in order, runs
    /// the new state's enter hook, then publishes a [`StateChange`] if
    /// `notify` is set. An out-of-range index is logged and changes nothing.
    pub fn set_current_state(&mut self, index: usize, notify: bool) -> bool {
        if !self.has_state(index) {
            error!(
                root = %self.config.name,
                root_id = %self.id,
                index,
                count = self.states.len(),
                "state index out of range"
            );
            return false;
        }

        let previous = self.current;
        let root: &Self = self;
        if previous != index && root.has_state(previous) {
            root.states[previous].fire(root, Phase::Exit);
        }

        self.current = index;
        let root: &Self = self;
        root.apply_elements(index);
        root.states[index].fire(root, Phase::Enter);

        debug!(root = %self.config.name, from = previous, to = index, notify, "state changed");
        if notify {
            self.publish_change(previous, index);
        }
        true
    }

    /// Move to the first state called `name`.
    ///
    /// Unlike [`set_current_state`](Self::set_current_state), this path runs
    /// no enter/exit hooks, and an unknown name fails silently.
    pub fn set_current_state_by_name(&mut self, name: &str, notify: bool) -> bool {
        let Some(index) = self.states.iter().position(|s| s.name() == name) else {
            return false;
        };

        let previous = self.current;
        self.current = index;
        self.apply_elements(index);

        debug!(root = %self.config.name, from = previous, to = index, notify, "state changed by name");
        if notify {
            self.publish_change(previous, index);
        }
        true
    }

    /// `set_current_state(index, true)`.
    pub fn set_state(&mut self, index: usize) -> bool {
        self.set_current_state(index, true)
    }

    /// Assign the current index: does nothing if `index` is already the
    /// current state, otherwise behaves as [`set_state`](Self::set_state).
    pub fn switch_to(&mut self, index: usize) -> bool {
        if self.current == index && self.has_state(index) {
            return true;
        }
        self.set_state(index)
    }

    /// Advance one state. Fails at the last state.
    pub fn next_state(&mut self) -> bool {
        let target = self.current.saturating_add(1);
        if self.has_state(target) {
            return self.set_state(target);
        }
        false
    }

    /// Step back one state. Fails at the first state.
    pub fn front_state(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(target) if self.has_state(target) => self.set_state(target),
            _ => false,
        }
    }

    /// Advance one state, wrapping from the last to the first.
    pub fn set_next_state_with_loop(&mut self, notify: bool) {
        let target = self.current.saturating_add(1);
        let target = if self.has_state(target) { target } else { 0 };
        self.set_current_state(target, notify);
    }

    /// Step back one state, wrapping from the first to the last.
    pub fn set_front_state_with_loop(&mut self, notify: bool) {
        let target = match self.current.checked_sub(1) {
            Some(target) if self.has_state(target) => target,
            _ => self.states.len().saturating_sub(1),
        };
        self.set_current_state(target, notify);
    }

    /// Re-apply the current state if the root is configured to do so.
    pub fn start(&mut self) -> bool {
        if !self.config.set_on_start {
            return false;
        }
        self.set_state(self.current)
    }

    /// Handle one click of the bound control.
    ///
    /// With click switching enabled, advances one state and resets to the
    /// first state past the end. A [`Click`] is published either way.
    pub fn click(&mut self) {
        let switched = if self.config.click_switches_state {
            self.next_state() || self.set_state(0)
        } else {
            false
        };

        self.clicked.emit(&Click {
            root_id: self.id,
            root: self.config.name.clone(),
            switched,
            current: self.current,
            at: Utc::now(),
        });
    }

    fn apply_elements(&self, index: usize) {
        for element in &self.elements {
            trace!(root = %self.config.name, kind = %element.kind(), state = index, "apply");
            element.agent().apply(self, element, index);
        }
    }

    fn publish_change(&self, previous: usize, index: usize) {
        let state = &self.states[index];
        self.state_changed.emit(&StateChange {
            root_id: self.id,
            root: self.config.name.clone(),
            from: self.has_state(previous).then_some(previous),
            to: index,
            state: state.id(),
            state_name: state.name().to_string(),
            at: Utc::now(),
        });
    }
}

impl<D: fmt::Debug> fmt::Debug for StateRoot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRoot")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("states", &self.states)
            .field("elements", &self.elements)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Blueprint;
    use crate::core::Agent;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        journal: Journal,
    }

    impl Agent<u8> for Recorder {
        fn apply(&self, root: &StateRoot<u8>, element: &Element<u8>, state: usize) {
            // The index is already committed when agents run.
            assert_eq!(root.current_index(), state);
            self.journal
                .lock()
                .push(format!("apply:{}:{}", element.kind(), state));
        }
    }

    fn root(names: &[&str]) -> (Journal, StateRoot<u8>) {
        let journal: Journal = Arc::default();
        let mut blueprint: Blueprint<u8> = Blueprint::named("Test").agent(
            "color",
            Recorder {
                journal: Arc::clone(&journal),
            },
        );
        for name in names {
            let index = blueprint.add_named_state(*name);
            let sink = Arc::clone(&journal);
            blueprint
                .state_mut(index)
                .unwrap()
                .on_phase(move |root, phase| {
                    let name = root.state_names()[index].to_string();
                    sink.lock().push(format!("{}:{}", phase, name));
                });
        }
        blueprint.add_element("color", None).unwrap();

        let root = blueprint.build().unwrap();
        let sink = Arc::clone(&journal);
        root.on_state_change()
            .subscribe(move |change| sink.lock().push(format!("notify:{}", change.to)));
        (journal, root)
    }

    fn drain(journal: &Journal) -> Vec<String> {
        std::mem::take(&mut *journal.lock())
    }

    #[test]
    fn has_state_matches_bounds() {
        let (_, root) = root(&["A", "B", "C"]);

        assert!(root.has_state(0));
        assert!(root.has_state(2));
        assert!(!root.has_state(3));
        assert!(!root.has_state(usize::MAX));
    }

    #[test]
    fn transition_runs_exit_apply_enter_notify_in_order() {
        let (journal, mut root) = root(&["Idle", "Active"]);

        assert!(root.set_current_state(1, true));

        assert_eq!(root.current_index(), 1);
        assert_eq!(
            drain(&journal),
            vec!["Exit:Idle", "apply:color:1", "Enter:Active", "notify:1"]
        );
    }

    #[test]
    fn transition_without_notify_skips_event() {
        let (journal, mut root) = root(&["Idle", "Active"]);

        assert!(root.set_current_state(1, false));

        assert_eq!(
            drain(&journal),
            vec!["Exit:Idle", "apply:color:1", "Enter:Active"]
        );
    }

    #[test]
    fn reentering_current_state_skips_exit() {
        let (journal, mut root) = root(&["Idle", "Active"]);

        assert!(root.set_current_state(0, true));

        assert_eq!(
            drain(&journal),
            vec!["apply:color:0", "Enter:Idle", "notify:0"]
        );
    }

    #[test]
    fn invalid_index_changes_nothing() {
        let (journal, mut root) = root(&["Idle", "Active"]);

        assert!(!root.set_current_state(2, true));

        assert_eq!(root.current_index(), 0);
        assert!(drain(&journal).is_empty());
    }

    #[test]
    fn name_transition_skips_hooks() {
        let (journal, mut root) = root(&["Idle", "Active"]);

        assert!(root.set_current_state_by_name("Active", true));

        assert_eq!(root.current_state_name(), Some("Active"));
        assert_eq!(drain(&journal), vec!["apply:color:1", "notify:1"]);
    }

    #[test]
    fn unknown_name_fails_silently() {
        let (journal, mut root) = root(&["Idle", "Active"]);

        assert!(!root.set_current_state_by_name("Missing", true));

        assert_eq!(root.current_index(), 0);
        assert!(drain(&journal).is_empty());
    }

    #[test]
    fn name_lookup_picks_first_match() {
        let (_, mut root) = root(&["Dup", "Other", "Dup"]);
        root.set_current_state(1, false);

        assert!(root.set_current_state_by_name("Dup", false));
        assert_eq!(root.current_index(), 0);
    }

    #[test]
    fn next_and_front_are_bounded() {
        let (_, mut root) = root(&["A", "B", "C"]);

        assert!(!root.front_state());
        assert!(root.next_state());
        assert!(root.next_state());
        assert_eq!(root.current_index(), 2);

        assert!(!root.next_state());
        assert_eq!(root.current_index(), 2);

        assert!(root.front_state());
        assert_eq!(root.current_index(), 1);
    }

    #[test]
    fn next_state_always_notifies() {
        let (journal, mut root) = root(&["A", "B"]);

        root.next_state();

        assert_eq!(drain(&journal).last().map(String::as_str), Some("notify:1"));
    }

    #[test]
    fn loop_helpers_wrap_around() {
        let (journal, mut root) = root(&["A", "B", "C"]);

        root.set_front_state_with_loop(false);
        assert_eq!(root.current_index(), 2);

        root.set_next_state_with_loop(false);
        assert_eq!(root.current_index(), 0);

        root.set_next_state_with_loop(false);
        assert_eq!(root.current_index(), 1);

        assert!(!drain(&journal).iter().any(|entry| entry.starts_with("notify")));
    }

    #[test]
    fn loop_helpers_on_empty_root_do_nothing() {
        let mut root: StateRoot<u8> = Blueprint::named("Empty").build().unwrap();

        root.set_next_state_with_loop(true);
        root.set_front_state_with_loop(true);

        assert_eq!(root.state_count(), 0);
        assert!(root.current_state().is_none());
    }

    #[test]
    fn switch_to_current_index_is_a_no_op() {
        let (journal, mut root) = root(&["A", "B"]);

        assert!(root.switch_to(0));
        assert!(drain(&journal).is_empty());

        assert!(root.switch_to(1));
        assert_eq!(root.current_index(), 1);
        assert!(!root.switch_to(5));
    }

    #[test]
    fn switch_to_on_empty_root_fails() {
        let mut root: StateRoot<u8> = Blueprint::named("Empty").build().unwrap();

        assert!(!root.has_state(0));
        assert!(!root.switch_to(0));
    }

    #[test]
    fn start_respects_configuration() {
        let (journal, mut root) = root(&["A", "B"]);
        assert!(!root.start());
        assert!(drain(&journal).is_empty());

        let mut blueprint: Blueprint<u8> = Blueprint::named("Starter").set_on_start(true);
        blueprint.add_state();
        let mut starter = blueprint.build().unwrap();
        assert!(starter.start());
    }

    #[test]
    fn click_without_switching_only_publishes() {
        let (journal, mut root) = root(&["A", "B"]);
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicks);
        root.on_click().subscribe(move |click| sink.lock().push(click.switched));

        root.click();

        assert_eq!(root.current_index(), 0);
        assert!(drain(&journal).is_empty());
        assert_eq!(*clicks.lock(), vec![false]);
    }

    #[test]
    fn click_advances_then_resets() {
        let (_, mut root) = root(&["A", "B"]);
        root.set_click_switches_state(true);
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicks);
        root.on_click()
            .subscribe(move |click| sink.lock().push((click.switched, click.current)));

        root.click();
        root.click();
        root.click();

        assert_eq!(*clicks.lock(), vec![(true, 1), (true, 0), (true, 1)]);
    }

    #[test]
    fn change_event_reports_previous_and_state_identity() {
        let (_, mut root) = root(&["Idle", "Active"]);
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        root.on_state_change()
            .subscribe(move |change| *sink.lock() = Some(change.clone()));

        root.set_state(1);

        let change = seen.lock().clone().unwrap();
        assert_eq!(change.root, "Test");
        assert_eq!(change.from, Some(0));
        assert_eq!(change.to, 1);
        assert_eq!(change.state, root.states()[1].id());
        assert_eq!(change.state_name, "Active");
    }

    #[test]
    fn smoothness_hint_can_be_toggled() {
        let mut root: StateRoot<u8> = Blueprint::named("Hint").smooth(false).build().unwrap();
        assert!(!root.is_smooth());

        root.set_smooth(true);
        assert!(root.is_smooth());
    }
}
