//! Outbound response envelope.

use serde::Deserialize;
use serde::Serialize;

use crate::AttributeMap;
use crate::RESPONSE_VERSION;
use crate::directive::Directive;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,

    /// Attributes carried into the next request of a continuing session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<AttributeMap>,

    pub response: Response,
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: None,
            response: Response::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    #[serde(default)]
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Card rendered in the companion app. Exactly one kind is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Card {
    Simple {
        title: String,
        content: String,
    },
    Standard {
        title: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<Image>,
    },
    LinkAccount,
    AskForPermissionsConsent {
        permissions: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image_url: Option<String>,
}
