//! Skill request dispatch runtime.
//!
//! A [`Skill`] validates an inbound [`RequestEnvelope`], runs it through
//! interceptors and the first matching handler, and returns the accumulated
//! [`ResponseEnvelope`].

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output must go through tracing.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod error;
pub mod handler;
pub mod response_builder;
pub mod session_state;
mod skill;
pub mod slot_resolution;
pub mod validator;

pub use askit_protocol as protocol;
pub use askit_protocol::RequestEnvelope;
pub use askit_protocol::ResponseEnvelope;
pub use config::ValidationConfig;
pub use error::BoxError;
pub use error::DispatchError;
pub use error::DispatchStage;
pub use error::ResponseBuildError;
pub use handler::ErrorHandler;
pub use handler::HandlerInput;
pub use handler::HandlerResult;
pub use handler::RequestContext;
pub use handler::RequestHandler;
pub use handler::RequestInterceptor;
pub use handler::ResponseInterceptor;
pub use handler::error_handler_fn;
pub use handler::handler_fn;
pub use handler::is_intent_name;
pub use handler::is_request_type;
pub use handler::request_interceptor_fn;
pub use handler::response_interceptor_fn;
pub use response_builder::ResponseBuilder;
pub use session_state::SessionStateLoader;
pub use session_state::SessionStatePersister;
pub use skill::Skill;
pub use skill::SkillBuilder;
pub use slot_resolution::ResolutionStatus;
pub use slot_resolution::is_slot_valid;
pub use slot_resolution::resolution_status;
pub use validator::RequestValidator;
