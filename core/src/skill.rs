//! Request dispatch.
//!
//! For each request the pipeline runs, in order:
//! 1. origin and freshness validation
//! 2. request interceptors, in registration order
//! 3. the first handler whose `can_handle` accepts the request
//! 4. response interceptors, in registration order
//!
//! A failure at any stage skips the remaining stages and is offered to the
//! error handlers. The first one that accepts it produces the response;
//! otherwise the failure is returned to the caller unchanged.

use askit_protocol::RequestEnvelope;
use askit_protocol::ResponseEnvelope;
use chrono::DateTime;
use chrono::Utc;
use tracing::debug;
use tracing::warn;

use crate::config::ValidationConfig;
use crate::error::DispatchError;
use crate::handler::ErrorHandler;
use crate::handler::HandlerInput;
use crate::handler::RequestHandler;
use crate::handler::RequestInterceptor;
use crate::handler::ResponseInterceptor;
use crate::validator::RequestValidator;

/// A configured skill. Immutable once built and safe to share between threads.
pub struct Skill<S = ()> {
    validator: RequestValidator,
    request_interceptors: Vec<Box<dyn RequestInterceptor<S>>>,
    handlers: Vec<Box<dyn RequestHandler<S>>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor<S>>>,
    error_handlers: Vec<Box<dyn ErrorHandler<S>>>,
}

impl<S> std::fmt::Debug for Skill<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("validation", self.validator.config())
            .field("request_interceptors", &self.request_interceptors.len())
            .field("handlers", &self.handlers.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .field("error_handlers", &self.error_handlers.len())
            .finish()
    }
}

impl<S> Skill<S> {
    pub fn builder() -> SkillBuilder<S> {
        SkillBuilder::default()
    }

    pub fn validation_config(&self) -> &ValidationConfig {
        self.validator.config()
    }

    /// Dispatch one request against the system clock.
    ///
    /// `Ok(None)` means the request was processed but nothing needs to be
    /// said, e.g. an unclaimed request or a handler that returned no response.
    pub fn process(
        &self,
        envelope: &RequestEnvelope,
    ) -> Result<Option<ResponseEnvelope>, DispatchError> {
        self.process_at(envelope, Utc::now())
    }

    /// Dispatch one request, validating freshness against `now`.
    pub fn process_at(
        &self,
        envelope: &RequestEnvelope,
        now: DateTime<Utc>,
    ) -> Result<Option<ResponseEnvelope>, DispatchError> {
        let request = &envelope.request;
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request.request_id,
            request_type = %request.request_type,
        );
        let _enter = span.enter();

        let mut input = HandlerInput::new(envelope);
        match self.run_stages(&mut input, now) {
            Ok(response) => Ok(response),
            Err(err) => self.dispatch_error(&mut input, err),
        }
    }

    fn run_stages(
        &self,
        input: &mut HandlerInput<'_, S>,
        now: DateTime<Utc>,
    ) -> Result<Option<ResponseEnvelope>, DispatchError> {
        self.validator.validate_at(input.request_envelope(), now)?;

        for interceptor in &self.request_interceptors {
            interceptor
                .process(input)
                .map_err(DispatchError::Interceptor)?;
        }

        let mut response = match self.handlers.iter().position(|h| h.can_handle(input)) {
            Some(index) => {
                debug!(handler = index, "dispatching to handler");
                self.handlers[index]
                    .handle(input)
                    .map_err(DispatchError::Handler)?
            }
            None => {
                debug!("no handler accepted the request");
                None
            }
        };

        for interceptor in &self.response_interceptors {
            interceptor
                .process(input, response.as_mut())
                .map_err(DispatchError::ResponseInterceptor)?;
        }

        Ok(response)
    }

    fn dispatch_error(
        &self,
        input: &mut HandlerInput<'_, S>,
        err: DispatchError,
    ) -> Result<Option<ResponseEnvelope>, DispatchError> {
        let stage = err.stage();
        let Some(index) = self
            .error_handlers
            .iter()
            .position(|h| h.can_handle(input, &err))
        else {
            warn!(?stage, error = %err, "no error handler accepted the failure");
            return Err(err);
        };

        warn!(?stage, error = %err, error_handler = index, "dispatching failure to error handler");
        self.error_handlers[index]
            .handle(input, &err)
            .map_err(DispatchError::ErrorHandler)
    }
}

/// Collects configuration and extension points for a [`Skill`].
///
/// Handlers are consulted in the order they are added.
pub struct SkillBuilder<S = ()> {
    validation: ValidationConfig,
    request_interceptors: Vec<Box<dyn RequestInterceptor<S>>>,
    handlers: Vec<Box<dyn RequestHandler<S>>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor<S>>>,
    error_handlers: Vec<Box<dyn ErrorHandler<S>>>,
}

impl<S> Default for SkillBuilder<S> {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            request_interceptors: Vec::new(),
            handlers: Vec::new(),
            response_interceptors: Vec::new(),
            error_handlers: Vec::new(),
        }
    }
}

impl<S> SkillBuilder<S> {
    pub fn validation(mut self, config: ValidationConfig) -> Self {
        self.validation = config;
        self
    }

    pub fn application_id(mut self, application_id: impl Into<String>) -> Self {
        self.validation = self.validation.with_application_id(application_id);
        self
    }

    pub fn ignore_timestamp(mut self) -> Self {
        self.validation = self.validation.ignoring_timestamp();
        self
    }

    pub fn request_interceptor(
        mut self,
        interceptor: impl RequestInterceptor<S> + 'static,
    ) -> Self {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn handler(mut self, handler: impl RequestHandler<S> + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn response_interceptor(
        mut self,
        interceptor: impl ResponseInterceptor<S> + 'static,
    ) -> Self {
        self.response_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn error_handler(mut self, handler: impl ErrorHandler<S> + 'static) -> Self {
        self.error_handlers.push(Box::new(handler));
        self
    }

    pub fn build(self) -> Skill<S> {
        Skill {
            validator: RequestValidator::new(self.validation),
            request_interceptors: self.request_interceptors,
            handlers: self.handlers,
            response_interceptors: self.response_interceptors,
            error_handlers: self.error_handlers,
        }
    }
}
