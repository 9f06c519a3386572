use std::sync::Arc;
use std::sync::Mutex;

use askit_core::BoxError;
use askit_core::HandlerInput;
use askit_core::RequestHandler;
use askit_core::ResponseEnvelope;
use askit_core::Skill;
use askit_core::handler_fn;
use askit_core::is_intent_name;
use askit_core::is_request_type;
use askit_core::protocol::intent::builtin;
use askit_core::protocol::response::OutputSpeech;
use askit_core::request_interceptor_fn;
use askit_core::response_interceptor_fn;
use askit_test_support::LogCapture;
use askit_test_support::TestRequest;
use askit_test_support::fixed_now;
use pretty_assertions::assert_eq;

#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

fn recording_handler(
    name: &'static str,
    accepts: bool,
    calls: &Calls,
) -> impl RequestHandler<()> + 'static {
    let probe = calls.clone();
    let calls = calls.clone();
    handler_fn(
        move |_: &HandlerInput<'_>| {
            probe.push(format!("can_handle:{name}"));
            accepts
        },
        move |input: &mut HandlerInput<'_>| {
            calls.push(format!("handle:{name}"));
            input.response_builder().speak(name);
            Ok(Some(input.build_response()))
        },
    )
}

fn speech(response: &ResponseEnvelope) -> Option<&str> {
    match &response.response.output_speech {
        Some(OutputSpeech::Ssml { ssml }) => Some(ssml.as_str()),
        Some(OutputSpeech::PlainText { text }) => Some(text.as_str()),
        None => None,
    }
}

#[test]
fn first_matching_handler_wins() -> anyhow::Result<()> {
    let calls = Calls::default();
    let skill: Skill = Skill::builder()
        .handler(recording_handler("A", true, &calls))
        .handler(recording_handler("B", true, &calls))
        .build();

    let response = skill.process_at(&TestRequest::launch().build(), fixed_now())?;

    assert_eq!(response.as_ref().and_then(speech), Some("<speak>A</speak>"));
    assert_eq!(calls.take(), vec!["can_handle:A", "handle:A"]);
    Ok(())
}

#[test]
fn handlers_are_consulted_in_registration_order() -> anyhow::Result<()> {
    let calls = Calls::default();
    let skill: Skill = Skill::builder()
        .handler(recording_handler("A", false, &calls))
        .handler(recording_handler("B", true, &calls))
        .handler(recording_handler("C", true, &calls))
        .build();

    let response = skill.process_at(&TestRequest::launch().build(), fixed_now())?;

    assert_eq!(response.as_ref().and_then(speech), Some("<speak>B</speak>"));
    assert_eq!(
        calls.take(),
        vec!["can_handle:A", "can_handle:B", "handle:B"]
    );
    Ok(())
}

#[test]
fn unclaimed_request_is_not_an_error() -> anyhow::Result<()> {
    let calls = Calls::default();
    let seen = calls.clone();
    let skill: Skill = Skill::builder()
        .handler(handler_fn(
            |input: &HandlerInput<'_>| is_request_type(input, "LaunchRequest"),
            |input: &mut HandlerInput<'_>| Ok(Some(input.build_response())),
        ))
        .response_interceptor(response_interceptor_fn(
            move |_: &mut HandlerInput<'_>, response: Option<&mut ResponseEnvelope>| {
                seen.push(format!("response_interceptor:{}", response.is_some()));
                Ok(())
            },
        ))
        .build();

    let response = skill.process_at(&TestRequest::of_type("FooRequest").build(), fixed_now())?;

    assert_eq!(response, None);
    assert_eq!(calls.take(), vec!["response_interceptor:false"]);
    Ok(())
}

#[test]
fn handler_may_return_no_response() -> anyhow::Result<()> {
    let skill: Skill = Skill::builder()
        .handler(handler_fn(
            |input: &HandlerInput<'_>| is_request_type(input, "SessionEndedRequest"),
            |_: &mut HandlerInput<'_>| Ok(None),
        ))
        .build();

    let request = TestRequest::of_type("SessionEndedRequest").build();
    assert_eq!(skill.process_at(&request, fixed_now())?, None);
    Ok(())
}

#[test]
fn stages_run_in_order() -> anyhow::Result<()> {
    let calls = Calls::default();
    let (first, second, handler, after_first, after_second) = (
        calls.clone(),
        calls.clone(),
        calls.clone(),
        calls.clone(),
        calls.clone(),
    );

    let skill: Skill = Skill::builder()
        .request_interceptor(request_interceptor_fn(move |_: &mut HandlerInput<'_>| {
            first.push("request_interceptor:1");
            Ok(())
        }))
        .request_interceptor(request_interceptor_fn(move |_: &mut HandlerInput<'_>| {
            second.push("request_interceptor:2");
            Ok(())
        }))
        .handler(handler_fn(
            |input: &HandlerInput<'_>| is_intent_name(input, builtin::HELP),
            move |input: &mut HandlerInput<'_>| {
                handler.push("handler");
                input.response_builder().speak("How can I help?");
                Ok(Some(input.build_response()))
            },
        ))
        .response_interceptor(response_interceptor_fn(
            move |_: &mut HandlerInput<'_>, response: Option<&mut ResponseEnvelope>| {
                after_first.push("response_interceptor:1");
                if let Some(response) = response {
                    response.response.should_end_session = true;
                }
                Ok(())
            },
        ))
        .response_interceptor(response_interceptor_fn(
            move |_: &mut HandlerInput<'_>, response: Option<&mut ResponseEnvelope>| {
                let ending = response.is_some_and(|r| r.response.should_end_session);
                after_second.push(format!("response_interceptor:2:{ending}"));
                Ok(())
            },
        ))
        .build();

    let response = skill.process_at(&TestRequest::intent(builtin::HELP).build(), fixed_now())?;

    assert_eq!(
        calls.take(),
        vec![
            "request_interceptor:1",
            "request_interceptor:2",
            "handler",
            "response_interceptor:1",
            "response_interceptor:2:true",
        ]
    );
    assert!(response.is_some_and(|r| r.response.should_end_session));
    Ok(())
}

#[test]
fn interceptor_failure_skips_remaining_stages() {
    let calls = Calls::default();
    let (handler, after) = (calls.clone(), calls.clone());

    let skill: Skill = Skill::builder()
        .request_interceptor(request_interceptor_fn(|_: &mut HandlerInput<'_>| {
            Err::<(), BoxError>("attribute store unavailable".into())
        }))
        .handler(handler_fn(
            |_: &HandlerInput<'_>| true,
            move |input: &mut HandlerInput<'_>| {
                handler.push("handler");
                Ok(Some(input.build_response()))
            },
        ))
        .response_interceptor(response_interceptor_fn(
            move |_: &mut HandlerInput<'_>, _: Option<&mut ResponseEnvelope>| {
                after.push("response_interceptor");
                Ok(())
            },
        ))
        .build();

    let err = skill
        .process_at(&TestRequest::launch().build(), fixed_now())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "request interceptor failed: attribute store unavailable"
    );
    assert!(calls.take().is_empty());
}

#[test]
fn interceptors_can_prepare_the_response() -> anyhow::Result<()> {
    let skill: Skill = Skill::builder()
        .request_interceptor(request_interceptor_fn(|input: &mut HandlerInput<'_>| {
            input.response_builder().with_simple_card("Quiz", "Welcome back");
            Ok(())
        }))
        .handler(handler_fn(
            |_: &HandlerInput<'_>| true,
            |input: &mut HandlerInput<'_>| {
                input.response_builder().speak("Ready?");
                Ok(Some(input.build_response()))
            },
        ))
        .build();

    let response = skill
        .process_at(&TestRequest::launch().build(), fixed_now())?
        .expect("handler responds");
    assert!(response.response.card.is_some());
    assert_eq!(speech(&response), Some("<speak>Ready?</speak>"));
    Ok(())
}

#[test]
fn dispatch_is_traced_per_request() {
    let skill: Skill = Skill::builder().build();
    let request = TestRequest::of_type("FooRequest").build();

    let (result, logs) = LogCapture::run(|| skill.process_at(&request, fixed_now()));

    assert!(matches!(result, Ok(None)));
    assert!(logs.contains("dispatch"), "logs: {logs}");
    assert!(logs.contains("amzn1.echo-api.request.test"), "logs: {logs}");
    assert!(logs.contains("no handler accepted the request"), "logs: {logs}");
}

#[test]
fn skill_is_shared_between_threads() {
    let calls = Calls::default();
    let skill: Skill = Skill::builder()
        .handler(recording_handler("A", true, &calls))
        .build();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let response = skill
                    .process_at(&TestRequest::launch().build(), fixed_now())
                    .unwrap();
                assert!(response.is_some());
            });
        }
    });

    let handled = calls
        .take()
        .into_iter()
        .filter(|call| call == "handle:A")
        .count();
    assert_eq!(handled, 4);
}
