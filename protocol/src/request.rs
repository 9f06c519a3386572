//! Inbound request envelope.
//!
//! The envelope arrives already deserialized and authenticated by the hosting
//! function. Kind-specific request fields are optional; only the ones that
//! belong to the request's kind are populated.

use serde::Deserialize;
use serde::Serialize;
use strum_macros::EnumString;

use crate::AttributeMap;
use crate::intent::DialogState;
use crate::intent::Intent;
use crate::serde_util::null_as_default;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,

    /// Absent for requests that are not part of a session (audio player events).
    #[serde(default, deserialize_with = "null_as_default")]
    pub session: Session,

    pub request: Request,

    #[serde(default, deserialize_with = "null_as_default")]
    pub context: Context,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,

    #[serde(default)]
    pub session_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: AttributeMap,

    #[serde(default)]
    pub application: Application,

    #[serde(default)]
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Snapshot of the platform and device state at the time of the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: System,

    #[serde(
        rename = "AudioPlayer",
        alias = "audioPlayer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_player: Option<AudioPlayerState>,
}

impl Context {
    /// Whether the requesting device advertises the named interface
    /// (e.g. `"Display"`, `"AudioPlayer"`, `"VideoApp"`).
    pub fn supports_interface(&self, name: &str) -> bool {
        self.system.device.supported_interfaces.contains_key(name)
    }

    pub fn supports_display(&self) -> bool {
        self.supports_interface("Display")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default)]
    pub api_access_token: String,

    #[serde(default)]
    pub api_endpoint: String,

    #[serde(default)]
    pub application: Application,

    #[serde(default)]
    pub device: Device,

    #[serde(default)]
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_interfaces: AttributeMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default)]
    pub offset_in_milliseconds: i64,

    #[serde(default)]
    pub player_activity: String,
}

/// The request body. Common fields are always present; the rest depend on
/// `request_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,

    #[serde(default)]
    pub request_id: String,

    /// ISO 8601 / RFC 3339 creation time, checked for freshness on receipt.
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub locale: String,

    // IntentRequest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_state: Option<DialogState>,

    // SessionEndedRequest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    // SessionEndedRequest, System.ExceptionEncountered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RequestError>,

    // System.ExceptionEncountered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<ErrorCause>,

    // AudioPlayer.* events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_in_milliseconds: Option<i64>,

    // AudioPlayer.PlaybackFailed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_playback_state: Option<AudioPlayerState>,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        self.request_type
            .parse()
            .unwrap_or_else(|_| RequestKind::Other(self.request_type.clone()))
    }

    /// Name of the recognized intent, or `""` for non-intent requests.
    pub fn intent_name(&self) -> &str {
        self.intent
            .as_ref()
            .map(|intent| intent.name.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RequestError {
    #[serde(rename = "type", default)]
    pub error_type: String,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCause {
    #[serde(default)]
    pub request_id: String,
}

/// Request kinds understood by the runtime. Unknown `type` strings parse to
/// [`RequestKind::Other`] rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum RequestKind {
    #[strum(serialize = "LaunchRequest")]
    Launch,
    #[strum(serialize = "IntentRequest")]
    Intent,
    #[strum(serialize = "SessionEndedRequest")]
    SessionEnded,
    #[strum(serialize = "AudioPlayer.PlaybackStarted")]
    PlaybackStarted,
    #[strum(serialize = "AudioPlayer.PlaybackFinished")]
    PlaybackFinished,
    #[strum(serialize = "AudioPlayer.PlaybackStopped")]
    PlaybackStopped,
    #[strum(serialize = "AudioPlayer.PlaybackNearlyFinished")]
    PlaybackNearlyFinished,
    #[strum(serialize = "AudioPlayer.PlaybackFailed")]
    PlaybackFailed,
    #[strum(serialize = "System.ExceptionEncountered")]
    SystemExceptionEncountered,
    #[strum(default)]
    Other(String),
}

impl RequestKind {
    pub fn is_audio_player_event(&self) -> bool {
        matches!(
            self,
            RequestKind::PlaybackStarted
                | RequestKind::PlaybackFinished
                | RequestKind::PlaybackStopped
                | RequestKind::PlaybackNearlyFinished
                | RequestKind::PlaybackFailed
        )
    }
}
