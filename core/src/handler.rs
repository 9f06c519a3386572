//! Per-request context and the extension points skill code plugs into.
//!
//! All extension traits are object safe and `Send + Sync` so a built
//! [`crate::Skill`] can be shared across threads. Closures are adapted with
//! [`handler_fn`], [`error_handler_fn`], [`request_interceptor_fn`] and
//! [`response_interceptor_fn`].

use std::marker::PhantomData;

use askit_protocol::Request;
use askit_protocol::RequestEnvelope;
use askit_protocol::RequestKind;
use askit_protocol::ResponseEnvelope;

use crate::error::BoxError;
use crate::error::DispatchError;
use crate::response_builder::ResponseBuilder;

/// What a handler (or error handler) produces: a response, no response, or a failure.
pub type HandlerResult = Result<Option<ResponseEnvelope>, BoxError>;

/// Typed per-request state shared by interceptors and handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext<S> {
    /// Skill-defined state, typically decoded from session attributes.
    pub session_state: Option<S>,
}

impl<S> Default for RequestContext<S> {
    fn default() -> Self {
        Self {
            session_state: None,
        }
    }
}

/// Everything skill code sees while a single request is dispatched.
///
/// Owned by the pipeline for the duration of one request and lent to each
/// stage in turn.
#[derive(Debug)]
pub struct HandlerInput<'a, S = ()> {
    envelope: &'a RequestEnvelope,
    response: Option<ResponseBuilder>,
    context: RequestContext<S>,
}

impl<'a, S> HandlerInput<'a, S> {
    pub fn new(envelope: &'a RequestEnvelope) -> Self {
        Self {
            envelope,
            response: None,
            context: RequestContext::default(),
        }
    }

    pub fn request_envelope(&self) -> &'a RequestEnvelope {
        self.envelope
    }

    pub fn request(&self) -> &'a Request {
        &self.envelope.request
    }

    pub fn request_kind(&self) -> RequestKind {
        self.envelope.request.kind()
    }

    /// The response accumulator, created on first use.
    pub fn response_builder(&mut self) -> &mut ResponseBuilder {
        self.response.get_or_insert_with(ResponseBuilder::new)
    }

    /// The accumulator if anything has touched it yet.
    pub fn existing_response_builder(&self) -> Option<&ResponseBuilder> {
        self.response.as_ref()
    }

    /// Snapshot of the accumulated response. Creates an empty one if needed.
    pub fn build_response(&mut self) -> ResponseEnvelope {
        self.response_builder().build()
    }

    pub fn context(&self) -> &RequestContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RequestContext<S> {
        &mut self.context
    }

    pub fn session_state(&self) -> Option<&S> {
        self.context.session_state.as_ref()
    }

    pub fn session_state_mut(&mut self) -> Option<&mut S> {
        self.context.session_state.as_mut()
    }

    pub fn set_session_state(&mut self, state: S) {
        self.context.session_state = Some(state);
    }
}

/// Runs before handler selection. A failure aborts the remaining stages.
pub trait RequestInterceptor<S>: Send + Sync {
    fn process(&self, input: &mut HandlerInput<'_, S>) -> Result<(), BoxError>;
}

/// Produces the response for requests it claims.
pub trait RequestHandler<S>: Send + Sync {
    fn can_handle(&self, input: &HandlerInput<'_, S>) -> bool;

    fn handle(&self, input: &mut HandlerInput<'_, S>) -> HandlerResult;
}

/// Runs after the handler with read/write access to its response, if any.
pub trait ResponseInterceptor<S>: Send + Sync {
    fn process(
        &self,
        input: &mut HandlerInput<'_, S>,
        response: Option<&mut ResponseEnvelope>,
    ) -> Result<(), BoxError>;
}

/// Converts a dispatch failure into a response.
pub trait ErrorHandler<S>: Send + Sync {
    fn can_handle(&self, input: &HandlerInput<'_, S>, error: &DispatchError) -> bool;

    fn handle(&self, input: &mut HandlerInput<'_, S>, error: &DispatchError) -> HandlerResult;
}

/// [`RequestHandler`] built from a predicate and a handler closure.
pub struct FnHandler<S, P, H> {
    can_handle: P,
    handle: H,
    _state: PhantomData<fn() -> S>,
}

pub fn handler_fn<S, P, H>(can_handle: P, handle: H) -> FnHandler<S, P, H>
where
    P: Fn(&HandlerInput<'_, S>) -> bool + Send + Sync,
    H: Fn(&mut HandlerInput<'_, S>) -> HandlerResult + Send + Sync,
{
    FnHandler {
        can_handle,
        handle,
        _state: PhantomData,
    }
}

impl<S, P, H> RequestHandler<S> for FnHandler<S, P, H>
where
    P: Fn(&HandlerInput<'_, S>) -> bool + Send + Sync,
    H: Fn(&mut HandlerInput<'_, S>) -> HandlerResult + Send + Sync,
{
    fn can_handle(&self, input: &HandlerInput<'_, S>) -> bool {
        (self.can_handle)(input)
    }

    fn handle(&self, input: &mut HandlerInput<'_, S>) -> HandlerResult {
        (self.handle)(input)
    }
}

/// [`ErrorHandler`] built from a predicate and a handler closure.
pub struct FnErrorHandler<S, P, H> {
    can_handle: P,
    handle: H,
    _state: PhantomData<fn() -> S>,
}

pub fn error_handler_fn<S, P, H>(can_handle: P, handle: H) -> FnErrorHandler<S, P, H>
where
    P: Fn(&HandlerInput<'_, S>, &DispatchError) -> bool + Send + Sync,
    H: Fn(&mut HandlerInput<'_, S>, &DispatchError) -> HandlerResult + Send + Sync,
{
    FnErrorHandler {
        can_handle,
        handle,
        _state: PhantomData,
    }
}

impl<S, P, H> ErrorHandler<S> for FnErrorHandler<S, P, H>
where
    P: Fn(&HandlerInput<'_, S>, &DispatchError) -> bool + Send + Sync,
    H: Fn(&mut HandlerInput<'_, S>, &DispatchError) -> HandlerResult + Send + Sync,
{
    fn can_handle(&self, input: &HandlerInput<'_, S>, error: &DispatchError) -> bool {
        (self.can_handle)(input, error)
    }

    fn handle(&self, input: &mut HandlerInput<'_, S>, error: &DispatchError) -> HandlerResult {
        (self.handle)(input, error)
    }
}

pub struct FnRequestInterceptor<S, F> {
    process: F,
    _state: PhantomData<fn() -> S>,
}

pub fn request_interceptor_fn<S, F>(process: F) -> FnRequestInterceptor<S, F>
where
    F: Fn(&mut HandlerInput<'_, S>) -> Result<(), BoxError> + Send + Sync,
{
    FnRequestInterceptor {
        process,
        _state: PhantomData,
    }
}

impl<S, F> RequestInterceptor<S> for FnRequestInterceptor<S, F>
where
    F: Fn(&mut HandlerInput<'_, S>) -> Result<(), BoxError> + Send + Sync,
{
    fn process(&self, input: &mut HandlerInput<'_, S>) -> Result<(), BoxError> {
        (self.process)(input)
    }
}

pub struct FnResponseInterceptor<S, F> {
    process: F,
    _state: PhantomData<fn() -> S>,
}

pub fn response_interceptor_fn<S, F>(process: F) -> FnResponseInterceptor<S, F>
where
    F: Fn(&mut HandlerInput<'_, S>, Option<&mut ResponseEnvelope>) -> Result<(), BoxError>
        + Send
        + Sync,
{
    FnResponseInterceptor {
        process,
        _state: PhantomData,
    }
}

impl<S, F> ResponseInterceptor<S> for FnResponseInterceptor<S, F>
where
    F: Fn(&mut HandlerInput<'_, S>, Option<&mut ResponseEnvelope>) -> Result<(), BoxError>
        + Send
        + Sync,
{
    fn process(
        &self,
        input: &mut HandlerInput<'_, S>,
        response: Option<&mut ResponseEnvelope>,
    ) -> Result<(), BoxError> {
        (self.process)(input, response)
    }
}

/// True when the request's `type` equals `request_type`, e.g. `"LaunchRequest"`.
pub fn is_request_type<S>(input: &HandlerInput<'_, S>, request_type: &str) -> bool {
    input.request().request_type == request_type
}

/// True for an `IntentRequest` whose intent is named `intent_name`.
pub fn is_intent_name<S>(input: &HandlerInput<'_, S>, intent_name: &str) -> bool {
    input.request_kind() == RequestKind::Intent && input.request().intent_name() == intent_name
}
