//! Directives: platform-side instructions embedded in a response.
//!
//! Directives are a closed set; each variant serializes with the `type`
//! discriminator the platform expects. Order within a response is the order
//! they were added.

use serde::Deserialize;
use serde::Serialize;

use crate::audio::AudioItem;
use crate::audio::ClearBehavior;
use crate::audio::PlayBehavior;
use crate::display::DisplayTemplate;
use crate::intent::Intent;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "Dialog.Delegate")]
    DialogDelegate(DialogDelegateDirective),

    #[serde(rename = "Dialog.ElicitSlot")]
    DialogElicitSlot(DialogElicitSlotDirective),

    #[serde(rename = "Dialog.ConfirmSlot")]
    DialogConfirmSlot(DialogConfirmSlotDirective),

    #[serde(rename = "Dialog.ConfirmIntent")]
    DialogConfirmIntent(DialogConfirmIntentDirective),

    #[serde(rename = "AudioPlayer.Play")]
    AudioPlayerPlay(AudioPlayerPlayDirective),

    #[serde(rename = "AudioPlayer.Stop")]
    AudioPlayerStop,

    #[serde(rename = "AudioPlayer.ClearQueue")]
    AudioPlayerClearQueue(AudioPlayerClearQueueDirective),

    #[serde(rename = "Display.RenderTemplate")]
    DisplayRenderTemplate(DisplayRenderTemplateDirective),

    #[serde(rename = "Hint")]
    Hint(HintDirective),

    #[serde(rename = "VideoApp.Launch")]
    VideoAppLaunch(VideoAppLaunchDirective),
}

impl Directive {
    /// Wire discriminator for this directive.
    pub fn type_name(&self) -> &'static str {
        match self {
            Directive::DialogDelegate(_) => "Dialog.Delegate",
            Directive::DialogElicitSlot(_) => "Dialog.ElicitSlot",
            Directive::DialogConfirmSlot(_) => "Dialog.ConfirmSlot",
            Directive::DialogConfirmIntent(_) => "Dialog.ConfirmIntent",
            Directive::AudioPlayerPlay(_) => "AudioPlayer.Play",
            Directive::AudioPlayerStop => "AudioPlayer.Stop",
            Directive::AudioPlayerClearQueue(_) => "AudioPlayer.ClearQueue",
            Directive::DisplayRenderTemplate(_) => "Display.RenderTemplate",
            Directive::Hint(_) => "Hint",
            Directive::VideoAppLaunch(_) => "VideoApp.Launch",
        }
    }

    pub fn is_video_app_launch(&self) -> bool {
        matches!(self, Directive::VideoAppLaunch(_))
    }
}

/// Hand the next dialog turn back to the platform's dialog model.
/// Only valid while the dialog state is `STARTED` or `IN_PROGRESS`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DialogDelegateDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_intent: Option<Intent>,
}

/// Ask the user for the value of `slot_to_elicit`. The prompt goes in the
/// response's output speech.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DialogElicitSlotDirective {
    pub slot_to_elicit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_intent: Option<Intent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DialogConfirmSlotDirective {
    pub slot_to_confirm: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_intent: Option<Intent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DialogConfirmIntentDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_intent: Option<Intent>,
}

/// Start or enqueue an audio stream. The session should stay open or playback
/// pauses immediately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerPlayDirective {
    pub play_behavior: PlayBehavior,
    pub audio_item: AudioItem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerClearQueueDirective {
    pub clear_behavior: ClearBehavior,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRenderTemplateDirective {
    pub template: DisplayTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HintDirective {
    pub hint: Hint,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Hint {
    PlainText { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoAppLaunchDirective {
    pub video_item: VideoItem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoItem {
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<VideoItemMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoItemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}
