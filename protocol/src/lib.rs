//! Wire types for the voice platform's skill request/response envelopes.
//!
//! Field names follow the platform's JSON protocol exactly; these types are
//! consumed as a fixed external format and are not meant to be redesigned.

pub mod audio;
pub mod directive;
pub mod display;
pub mod intent;
pub mod request;
pub mod response;

mod serde_util;

pub use directive::Directive;
pub use intent::Intent;
pub use intent::IntentSlot;
pub use request::Request;
pub use request::RequestEnvelope;
pub use request::RequestKind;
pub use response::Response;
pub use response::ResponseEnvelope;

/// Protocol version written into every outbound envelope.
pub const RESPONSE_VERSION: &str = "1.0";

/// Loosely-typed JSON object used for session attributes.
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;
