use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use askit_core::BoxError;
use askit_core::DispatchError;
use askit_core::DispatchStage;
use askit_core::HandlerInput;
use askit_core::ResponseEnvelope;
use askit_core::Skill;
use askit_core::error_handler_fn;
use askit_core::handler_fn;
use askit_core::protocol::response::OutputSpeech;
use askit_core::response_interceptor_fn;
use askit_test_support::TestRequest;
use askit_test_support::fixed_now;
use pretty_assertions::assert_eq;

fn failing_handler(message: &'static str) -> impl askit_core::RequestHandler<()> + 'static {
    handler_fn(
        |_: &HandlerInput<'_>| true,
        move |_: &mut HandlerInput<'_>| Err::<Option<ResponseEnvelope>, BoxError>(message.into()),
    )
}

fn apologize(
    input: &mut HandlerInput<'_>,
    _: &DispatchError,
) -> Result<Option<ResponseEnvelope>, BoxError> {
    input
        .response_builder()
        .speak("Sorry, something went wrong.")
        .with_should_end_session(true);
    Ok(Some(input.build_response()))
}

#[test]
fn validation_failure_without_error_handler_is_returned() {
    let handled = Arc::new(AtomicUsize::new(0));
    let counter = handled.clone();
    let skill: Skill = Skill::builder()
        .application_id("app-1")
        .handler(handler_fn(
            |_: &HandlerInput<'_>| true,
            move |input: &mut HandlerInput<'_>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(input.build_response()))
            },
        ))
        .build();

    let request = TestRequest::launch().application_id("").build();
    let err = skill.process_at(&request, fixed_now()).unwrap_err();

    match err {
        DispatchError::IdentityMismatch { expected, actual } => {
            assert_eq!(expected, "app-1");
            assert_eq!(actual, "");
        }
        other => panic!("expected IdentityMismatch, got {other:?}"),
    }
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[test]
fn validation_failure_reaches_error_handlers() -> anyhow::Result<()> {
    let skill: Skill = Skill::builder()
        .application_id("app-1")
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, err: &DispatchError| err.is_validation(),
            apologize,
        ))
        .build();

    let request = TestRequest::launch().application_id("app-2").build();
    let response = skill
        .process_at(&request, fixed_now())?
        .expect("error handler responds");

    assert_eq!(
        response.response.output_speech,
        Some(OutputSpeech::Ssml {
            ssml: "<speak>Sorry, something went wrong.</speak>".to_string()
        })
    );
    assert!(response.response.should_end_session);
    Ok(())
}

#[test]
fn first_capable_error_handler_is_used() -> anyhow::Result<()> {
    let declined = Arc::new(AtomicUsize::new(0));
    let declined_probe = declined.clone();
    let skill: Skill = Skill::builder()
        .handler(failing_handler("quiz data missing"))
        .error_handler(error_handler_fn(
            move |_: &HandlerInput<'_>, err: &DispatchError| {
                declined_probe.fetch_add(1, Ordering::SeqCst);
                err.is_validation()
            },
            |_: &mut HandlerInput<'_>, _: &DispatchError| Ok(None),
        ))
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, err: &DispatchError| err.stage() == DispatchStage::Handling,
            |input: &mut HandlerInput<'_>, err: &DispatchError| {
                input
                    .response_builder()
                    .speak_plain_text(format!("handled: {err}"));
                Ok(Some(input.build_response()))
            },
        ))
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, _: &DispatchError| true,
            |_: &mut HandlerInput<'_>, _: &DispatchError| {
                Err::<Option<ResponseEnvelope>, BoxError>("catch-all must not run".into())
            },
        ))
        .build();

    let response = skill
        .process_at(&TestRequest::launch().build(), fixed_now())?
        .expect("error handler responds");

    assert_eq!(
        response.response.output_speech,
        Some(OutputSpeech::PlainText {
            text: "handled: request handler failed: quiz data missing".to_string()
        })
    );
    assert_eq!(declined.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn unclaimed_failure_is_returned_unchanged() {
    let skill: Skill = Skill::builder()
        .handler(failing_handler("boom"))
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, err: &DispatchError| err.is_validation(),
            apologize,
        ))
        .build();

    let err = skill
        .process_at(&TestRequest::launch().build(), fixed_now())
        .unwrap_err();

    assert_eq!(err.stage(), DispatchStage::Handling);
    assert_eq!(err.to_string(), "request handler failed: boom");
}

#[test]
fn failing_error_handler_is_reported() {
    let skill: Skill = Skill::builder()
        .handler(failing_handler("boom"))
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, _: &DispatchError| true,
            |_: &mut HandlerInput<'_>, _: &DispatchError| {
                Err::<Option<ResponseEnvelope>, BoxError>("apology unavailable".into())
            },
        ))
        .build();

    let err = skill
        .process_at(&TestRequest::launch().build(), fixed_now())
        .unwrap_err();

    assert!(matches!(err, DispatchError::ErrorHandler(_)));
    assert_eq!(err.to_string(), "error handler failed: apology unavailable");
}

#[test]
fn response_interceptor_failure_is_dispatched() -> anyhow::Result<()> {
    let skill: Skill = Skill::builder()
        .handler(handler_fn(
            |_: &HandlerInput<'_>| true,
            |input: &mut HandlerInput<'_>| Ok(Some(input.build_response())),
        ))
        .response_interceptor(response_interceptor_fn(
            |_: &mut HandlerInput<'_>, _: Option<&mut ResponseEnvelope>| {
                Err::<(), BoxError>("could not save attributes".into())
            },
        ))
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, err: &DispatchError| {
                err.stage() == DispatchStage::ResponseIntercepting
            },
            |_: &mut HandlerInput<'_>, _: &DispatchError| Ok(None),
        ))
        .build();

    assert_eq!(
        skill.process_at(&TestRequest::launch().build(), fixed_now())?,
        None
    );
    Ok(())
}

#[test]
fn stale_request_is_offered_to_error_handlers() -> anyhow::Result<()> {
    let skill: Skill = Skill::builder()
        .error_handler(error_handler_fn(
            |_: &HandlerInput<'_>, err: &DispatchError| {
                matches!(err, DispatchError::StaleOrFutureRequest { .. })
            },
            apologize,
        ))
        .build();

    let request = TestRequest::launch().offset_secs(-151).build();
    assert!(skill.process_at(&request, fixed_now())?.is_some());
    Ok(())
}
