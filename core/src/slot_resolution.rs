//! Entity-resolution status of recognized slot values.
//!
//! The platform attaches a loosely-typed `resolutions` record to slots whose
//! type has a defined value list:
//!
//! ```json
//! {"resolutionsPerAuthority": [{"authority": "...", "status": {"code": "ER_SUCCESS_MATCH"}}]}
//! ```
//!
//! The record is parsed leniently. A missing or non-object record means the
//! platform attached nothing and already validated the value (`Unverified`);
//! any deeper shape mismatch yields `Unknown`. Neither case is an error.

use askit_protocol::IntentSlot;
use serde::Deserialize;
use serde_json::Value;

pub const ER_SUCCESS_MATCH: &str = "ER_SUCCESS_MATCH";
pub const ER_SUCCESS_NO_MATCH: &str = "ER_SUCCESS_NO_MATCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// Resolution data present but malformed, or an unrecognized status code.
    Unknown,
    /// The value matched the slot type's value list.
    Found,
    /// The value did not match the slot type's value list.
    NotFound,
    /// No resolution data was attached.
    Unverified,
}

impl ResolutionStatus {
    /// A value is usable if it matched, or if no value-list constraint applied.
    pub fn is_valid(self) -> bool {
        matches!(self, ResolutionStatus::Found | ResolutionStatus::Unverified)
    }

    fn from_code(code: &str) -> Self {
        match code {
            ER_SUCCESS_MATCH => ResolutionStatus::Found,
            ER_SUCCESS_NO_MATCH => ResolutionStatus::NotFound,
            _ => ResolutionStatus::Unknown,
        }
    }
}

/// Schema-tolerant view of a slot's `resolutions` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionRecord {
    Absent,
    Malformed,
    Resolution { code: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Resolutions {
    // Left untyped so a malformed later authority cannot fail the first.
    resolutions_per_authority: Vec<Value>,
}

#[derive(Deserialize)]
struct AuthorityResolution {
    status: AuthorityStatus,
}

#[derive(Deserialize)]
struct AuthorityStatus {
    code: String,
}

impl ResolutionRecord {
    /// Classify a raw record. The first authority's status decides.
    pub fn parse(resolutions: Option<&Value>) -> Self {
        let Some(value @ Value::Object(_)) = resolutions else {
            return ResolutionRecord::Absent;
        };

        let first = Resolutions::deserialize(value).and_then(|parsed| {
            match parsed.resolutions_per_authority.first() {
                Some(authority) => AuthorityResolution::deserialize(authority).map(Some),
                None => Ok(None),
            }
        });

        match first {
            Ok(Some(authority)) => ResolutionRecord::Resolution {
                code: authority.status.code,
            },
            Ok(None) => ResolutionRecord::Malformed,
            Err(err) => {
                tracing::debug!("slot resolution record has unexpected shape: {err}");
                ResolutionRecord::Malformed
            }
        }
    }

    pub fn status(&self) -> ResolutionStatus {
        match self {
            ResolutionRecord::Absent => ResolutionStatus::Unverified,
            ResolutionRecord::Malformed => ResolutionStatus::Unknown,
            ResolutionRecord::Resolution { code } => ResolutionStatus::from_code(code),
        }
    }
}

pub fn resolution_status(slot: &IntentSlot) -> ResolutionStatus {
    ResolutionRecord::parse(slot.resolutions.as_ref()).status()
}

/// Whether the slot's value can be trusted by skill logic.
pub fn is_slot_valid(slot: &IntentSlot) -> bool {
    resolution_status(slot).is_valid()
}
