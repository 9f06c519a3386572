use askit_core::BoxError;
use askit_core::HandlerInput;
use askit_core::ResolutionStatus;
use askit_core::ResponseEnvelope;
use askit_core::Skill;
use askit_core::handler_fn;
use askit_core::is_intent_name;
use askit_core::is_slot_valid;
use askit_core::protocol::IntentSlot;
use askit_core::protocol::audio::PlayBehavior;
use askit_core::resolution_status;
use askit_test_support::TestRequest;
use askit_test_support::fixed_now;
use pretty_assertions::assert_eq;
use serde_json::json;

fn answer_skill() -> Skill {
    Skill::builder()
        .handler(handler_fn(
            |input: &HandlerInput<'_>| is_intent_name(input, "AnswerIntent"),
            |input: &mut HandlerInput<'_>| -> Result<Option<ResponseEnvelope>, BoxError> {
                let slot = input
                    .request()
                    .intent
                    .as_ref()
                    .and_then(|intent| intent.slot("StateName"));
                let valid = slot.is_some_and(is_slot_valid);
                let builder = input.response_builder();
                if valid {
                    builder.speak("That is correct.");
                } else {
                    builder
                        .speak("I didn't catch that.")
                        .reprompt("Which state?")
                        .add_elicit_slot_directive("StateName", None)?;
                }
                Ok(Some(input.build_response()))
            },
        ))
        .build()
}

fn answer_request(resolutions: Option<serde_json::Value>) -> askit_core::RequestEnvelope {
    let mut request = TestRequest::intent("AnswerIntent").build();
    if let Some(intent) = request.request.intent.as_mut() {
        intent.slots.insert(
            "StateName".to_string(),
            IntentSlot {
                name: "StateName".to_string(),
                value: "ohio".to_string(),
                resolutions,
                ..IntentSlot::default()
            },
        );
    }
    request
}

#[test]
fn resolved_slot_is_accepted() -> anyhow::Result<()> {
    let request = answer_request(Some(json!({
        "resolutionsPerAuthority": [{"status": {"code": "ER_SUCCESS_MATCH"}}]
    })));

    let response = answer_skill()
        .process_at(&request, fixed_now())?
        .expect("answer response");

    assert_eq!(
        serde_json::to_value(&response)?,
        json!({
            "version": "1.0",
            "response": {
                "outputSpeech": {"type": "SSML", "ssml": "<speak>That is correct.</speak>"},
                "shouldEndSession": false
            }
        })
    );
    Ok(())
}

#[test]
fn unmatched_slot_is_elicited_again() -> anyhow::Result<()> {
    let request = answer_request(Some(json!({
        "resolutionsPerAuthority": [{"status": {"code": "ER_SUCCESS_NO_MATCH"}}]
    })));
    let slot = request
        .request
        .intent
        .as_ref()
        .and_then(|intent| intent.slot("StateName"))
        .expect("slot present");
    assert_eq!(resolution_status(slot), ResolutionStatus::NotFound);

    let response = answer_skill()
        .process_at(&request, fixed_now())?
        .expect("answer response");

    assert_eq!(
        serde_json::to_value(&response)?,
        json!({
            "version": "1.0",
            "response": {
                "outputSpeech": {"type": "SSML", "ssml": "<speak>I didn't catch that.</speak>"},
                "reprompt": {
                    "outputSpeech": {"type": "SSML", "ssml": "<speak>Which state?</speak>"}
                },
                "directives": [{"type": "Dialog.ElicitSlot", "slotToElicit": "StateName"}],
                "shouldEndSession": false
            }
        })
    );
    Ok(())
}

#[test]
fn slot_without_resolutions_is_trusted() -> anyhow::Result<()> {
    let response = answer_skill()
        .process_at(&answer_request(None), fixed_now())?
        .expect("answer response");
    assert_eq!(
        response.response.output_speech,
        Some(askit_core::protocol::response::OutputSpeech::Ssml {
            ssml: "<speak>That is correct.</speak>".to_string()
        })
    );
    Ok(())
}

#[test]
fn video_launch_keeps_session_open_through_the_pipeline() -> anyhow::Result<()> {
    let skill: Skill = Skill::builder()
        .handler(handler_fn(
            |_: &HandlerInput<'_>| true,
            |input: &mut HandlerInput<'_>| -> Result<Option<ResponseEnvelope>, BoxError> {
                input
                    .response_builder()
                    .speak("<speak>Here is the trailer</speak>")
                    .with_should_end_session(true)
                    .add_video_app_launch_directive(
                        "https://videos.example.com/trailer.mp4",
                        Some("Trailer".to_string()),
                        None,
                    )?
                    .with_should_end_session(true);
                Ok(Some(input.build_response()))
            },
        ))
        .build();

    let response = skill
        .process_at(&TestRequest::launch().build(), fixed_now())?
        .expect("video response");

    assert_eq!(
        serde_json::to_value(&response)?,
        json!({
            "version": "1.0",
            "response": {
                "outputSpeech": {"type": "SSML", "ssml": "<speak>Here is the trailer</speak>"},
                "directives": [{
                    "type": "VideoApp.Launch",
                    "videoItem": {
                        "source": "https://videos.example.com/trailer.mp4",
                        "metadata": {"title": "Trailer"}
                    }
                }],
                "shouldEndSession": false
            }
        })
    );
    Ok(())
}

#[test]
fn invalid_directive_fails_the_handler() {
    let skill: Skill = Skill::builder()
        .handler(handler_fn(
            |_: &HandlerInput<'_>| true,
            |input: &mut HandlerInput<'_>| -> Result<Option<ResponseEnvelope>, BoxError> {
                input.response_builder().add_audio_player_play_directive(
                    PlayBehavior::ReplaceAll,
                    "https://audio.example.com/episode.mp3",
                    "",
                    0,
                    None,
                    None,
                )?;
                Ok(Some(input.build_response()))
            },
        ))
        .build();

    let err = skill
        .process_at(&TestRequest::launch().build(), fixed_now())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "request handler failed: AudioPlayer.Play directive requires a non-empty token"
    );
}
