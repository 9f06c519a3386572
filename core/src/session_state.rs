//! Typed session state carried between turns in session attributes.
//!
//! [`SessionStateLoader`] decodes the inbound attributes into the skill's
//! state type before any handler runs. [`SessionStatePersister`] writes the
//! state back into the outbound envelope while the session stays open.

use std::marker::PhantomData;

use askit_protocol::ResponseEnvelope;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::error::BoxError;
use crate::handler::HandlerInput;
use crate::handler::RequestInterceptor;
use crate::handler::ResponseInterceptor;

#[derive(Debug, Error)]
pub enum SessionStateError {
    #[error("session attributes do not match the skill state: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode skill state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("skill state must serialize to a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
}

/// Request interceptor that populates [`HandlerInput::session_state`].
///
/// A request without attributes (new session, audio player event) starts
/// from `S::default()`.
pub struct SessionStateLoader<S> {
    _state: PhantomData<fn() -> S>,
}

impl<S> SessionStateLoader<S> {
    pub fn new() -> Self {
        Self {
            _state: PhantomData,
        }
    }
}

impl<S> Default for SessionStateLoader<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RequestInterceptor<S> for SessionStateLoader<S>
where
    S: DeserializeOwned + Default,
{
    fn process(&self, input: &mut HandlerInput<'_, S>) -> Result<(), BoxError> {
        let attributes = &input.request_envelope().session.attributes;
        let state = if attributes.is_empty() {
            S::default()
        } else {
            serde_json::from_value(Value::Object(attributes.clone()))
                .map_err(SessionStateError::Decode)?
        };
        input.set_session_state(state);
        Ok(())
    }
}

/// Response interceptor that stores the session state as session attributes.
///
/// Skips responses that end the session, requests that produced no response,
/// and requests where no state was ever set.
pub struct SessionStatePersister<S> {
    _state: PhantomData<fn() -> S>,
}

impl<S> SessionStatePersister<S> {
    pub fn new() -> Self {
        Self {
            _state: PhantomData,
        }
    }
}

impl<S> Default for SessionStatePersister<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ResponseInterceptor<S> for SessionStatePersister<S>
where
    S: Serialize,
{
    fn process(
        &self,
        input: &mut HandlerInput<'_, S>,
        response: Option<&mut ResponseEnvelope>,
    ) -> Result<(), BoxError> {
        let Some(response) = response else {
            return Ok(());
        };
        if response.response.should_end_session {
            tracing::debug!("session ending; not persisting session state");
            return Ok(());
        }
        let Some(state) = input.session_state() else {
            return Ok(());
        };

        match serde_json::to_value(state).map_err(SessionStateError::Encode)? {
            Value::Object(attributes) => {
                response.session_attributes = Some(attributes);
                Ok(())
            }
            other => Err(SessionStateError::NotAnObject {
                kind: json_kind(&other),
            }
            .into()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
