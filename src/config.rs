//! Root settings.
//!
//! Settings are plain serde data so hosts can keep them alongside whatever
//! else they load at startup. Every field has a default; a missing field in
//! the source document falls back to it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid root settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Owner-level settings of a state root.
///
/// # Example
///
/// ```rust
/// use switchboard::RootConfig;
///
/// let config = RootConfig::from_json(r#"{ "name": "PlayButton", "smooth": false }"#).unwrap();
///
/// assert_eq!(config.name, "PlayButton");
/// assert!(!config.smooth);
/// assert!(!config.click_switches_state);
/// assert_eq!(config.initial_state, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Owner name, used in logs and events.
    pub name: String,
    /// Hint for agents: animate between states rather than snap.
    pub smooth: bool,
    /// Whether a click advances the state (resetting to 0 past the end).
    pub click_switches_state: bool,
    /// Whether [`StateRoot::start`](crate::StateRoot::start) re-applies the
    /// current state.
    pub set_on_start: bool,
    /// Index the root starts at. Removing or swapping states on a blueprint
    /// keeps it on the same state.
    pub initial_state: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            name: String::from("StateRoot"),
            smooth: true,
            click_switches_state: false,
            set_on_start: false,
            initial_state: 0,
        }
    }
}

impl RootConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}
