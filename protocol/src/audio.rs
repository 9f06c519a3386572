//! AudioPlayer interface payloads.

use serde::Deserialize;
use serde::Serialize;

use crate::display::DisplayImageObject;

/// Whether a play directive starts immediately or is queued.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Stop the current stream and replace the whole queue.
    ReplaceAll,
    /// Append to the end of the queue.
    Enqueue,
    /// Replace everything queued after the current stream.
    ReplaceEnqueued,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearBehavior {
    /// Clear the queue, keep playing the current stream.
    ClearEnqueued,
    /// Clear the queue and stop the current stream.
    ClearAll,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioItem {
    pub stream: AudioStream,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AudioItemMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AudioStream {
    pub url: String,

    pub token: String,

    /// Required by the platform when enqueueing behind another stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,

    #[serde(default)]
    pub offset_in_milliseconds: i64,
}

/// Metadata shown on screen devices while the stream plays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AudioItemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art: Option<DisplayImageObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<DisplayImageObject>,
}
