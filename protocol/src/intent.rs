//! Intents and slots recognized from the user's utterance.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::serde_util::null_as_default;

/// Built-in intent names the platform routes to every skill.
pub mod builtin {
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    pub const FALLBACK: &str = "AMAZON.FallbackIntent";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const NAVIGATE_HOME: &str = "AMAZON.NavigateHomeIntent";
    pub const NO: &str = "AMAZON.NoIntent";
    pub const PAUSE: &str = "AMAZON.PauseIntent";
    pub const REPEAT: &str = "AMAZON.RepeatIntent";
    pub const RESUME: &str = "AMAZON.ResumeIntent";
    pub const START_OVER: &str = "AMAZON.StartOverIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const YES: &str = "AMAZON.YesIntent";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    #[default]
    None,
    Confirmed,
    Denied,
}

/// Progress of a multi-turn dialog managed by the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogState {
    Started,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,

    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,

    /// Slot name -> slot. Keys are unique; ordering is by name.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub slots: BTreeMap<String, IntentSlot>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn slot(&self, name: &str) -> Option<&IntentSlot> {
        self.slots.get(name)
    }

    /// Raw value of the named slot, if the slot exists and was filled.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slot(name)
            .map(|slot| slot.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IntentSlot {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,

    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,

    /// Per-authority entity resolution record. Kept opaque on the wire; see
    /// the slot resolution inspector in `askit-core` for its interpretation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<serde_json::Value>,
}
