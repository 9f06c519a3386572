//! Origin and freshness gate applied before any skill code runs.

use askit_protocol::RequestEnvelope;
use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;

use crate::config::ValidationConfig;
use crate::error::DispatchError;

/// Checks the request's application identity and timestamp freshness.
///
/// Purely a predicate: no state is kept between requests.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    config: ValidationConfig,
}

impl RequestValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate(&self, envelope: &RequestEnvelope) -> Result<(), DispatchError> {
        self.validate_at(envelope, Utc::now())
    }

    /// Identity check, then freshness check, against the supplied clock.
    pub fn validate_at(
        &self,
        envelope: &RequestEnvelope,
        now: DateTime<Utc>,
    ) -> Result<(), DispatchError> {
        self.verify_application_id(envelope)?;
        self.verify_timestamp(envelope, now)
    }

    fn verify_application_id(&self, envelope: &RequestEnvelope) -> Result<(), DispatchError> {
        let Some(expected) = self.config.expected_application_id() else {
            tracing::debug!("application id not configured; skipping application verification");
            return Ok(());
        };

        let actual = envelope.session.application.application_id.as_str();
        if actual.is_empty() || actual != expected {
            tracing::warn!(expected, actual, "request application id rejected");
            return Err(DispatchError::IdentityMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(())
    }

    fn verify_timestamp(
        &self,
        envelope: &RequestEnvelope,
        now: DateTime<Utc>,
    ) -> Result<(), DispatchError> {
        if self.config.ignore_timestamp {
            tracing::debug!("timestamp verification disabled; skipping freshness check");
            return Ok(());
        }

        let raw = envelope.request.timestamp.as_str();
        let timestamp = DateTime::parse_from_rfc3339(raw)
            .map_err(|source| {
                tracing::warn!(timestamp = raw, "unable to parse request timestamp");
                DispatchError::MalformedTimestamp {
                    timestamp: raw.to_string(),
                    source,
                }
            })?
            .with_timezone(&Utc);

        let tolerance_secs = self.config.timestamp_tolerance_secs;
        let tolerance = i64::try_from(tolerance_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);

        let delta = (now - timestamp).abs();
        if delta > tolerance {
            tracing::warn!(
                %timestamp,
                %now,
                tolerance_secs,
                "request timestamp outside tolerance window"
            );
            return Err(DispatchError::StaleOrFutureRequest {
                timestamp,
                now,
                tolerance_secs,
            });
        }

        Ok(())
    }
}
