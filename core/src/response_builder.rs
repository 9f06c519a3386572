//! Fluent accumulator for a single outbound response.
//!
//! Setters overwrite whatever was set before. Directives are append-only and
//! keep insertion order. Once a `VideoApp.Launch` directive is present the
//! session can no longer be ended.

use askit_protocol::Directive;
use askit_protocol::Intent;
use askit_protocol::ResponseEnvelope;
use askit_protocol::audio::AudioItem;
use askit_protocol::audio::AudioItemMetadata;
use askit_protocol::audio::AudioStream;
use askit_protocol::audio::ClearBehavior;
use askit_protocol::audio::PlayBehavior;
use askit_protocol::directive::AudioPlayerClearQueueDirective;
use askit_protocol::directive::AudioPlayerPlayDirective;
use askit_protocol::directive::DialogConfirmIntentDirective;
use askit_protocol::directive::DialogConfirmSlotDirective;
use askit_protocol::directive::DialogDelegateDirective;
use askit_protocol::directive::DialogElicitSlotDirective;
use askit_protocol::directive::DisplayRenderTemplateDirective;
use askit_protocol::directive::Hint;
use askit_protocol::directive::HintDirective;
use askit_protocol::directive::VideoAppLaunchDirective;
use askit_protocol::directive::VideoItem;
use askit_protocol::directive::VideoItemMetadata;
use askit_protocol::display::DisplayTemplate;
use askit_protocol::response::Card;
use askit_protocol::response::Image;
use askit_protocol::response::OutputSpeech;
use askit_protocol::response::Reprompt;
use askit_utils_ssml::wrap_speech;

use crate::error::ResponseBuildError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBuilder {
    envelope: ResponseEnvelope,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak `speech` as SSML. Any existing `<speak>` root is replaced, never nested.
    pub fn speak(&mut self, speech: &str) -> &mut Self {
        self.envelope.response.output_speech = Some(ssml(speech));
        self
    }

    pub fn speak_plain_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.envelope.response.output_speech = Some(OutputSpeech::PlainText { text: text.into() });
        self
    }

    /// Speech used when the user does not answer; keeps the microphone open.
    pub fn reprompt(&mut self, speech: &str) -> &mut Self {
        self.envelope.response.reprompt = Some(Reprompt {
            output_speech: ssml(speech),
        });
        self
    }

    pub fn with_simple_card(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> &mut Self {
        self.set_card(Card::Simple {
            title: title.into(),
            content: content.into(),
        })
    }

    pub fn with_standard_card(
        &mut self,
        title: impl Into<String>,
        text: impl Into<String>,
        small_image_url: Option<String>,
        large_image_url: Option<String>,
    ) -> &mut Self {
        let image = if small_image_url.is_some() || large_image_url.is_some() {
            Some(Image {
                small_image_url,
                large_image_url,
            })
        } else {
            None
        };
        self.set_card(Card::Standard {
            title: title.into(),
            text: text.into(),
            image,
        })
    }

    pub fn with_link_account_card(&mut self) -> &mut Self {
        self.set_card(Card::LinkAccount)
    }

    pub fn with_ask_for_permissions_consent_card<I, P>(&mut self, permissions: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.set_card(Card::AskForPermissionsConsent {
            permissions: permissions.into_iter().map(Into::into).collect(),
        })
    }

    fn set_card(&mut self, card: Card) -> &mut Self {
        self.envelope.response.card = Some(card);
        self
    }

    pub fn add_delegate_directive(&mut self, updated_intent: Option<Intent>) -> &mut Self {
        self.push_directive(Directive::DialogDelegate(DialogDelegateDirective {
            updated_intent,
        }))
    }

    pub fn add_elicit_slot_directive(
        &mut self,
        slot_to_elicit: impl Into<String>,
        updated_intent: Option<Intent>,
    ) -> Result<&mut Self, ResponseBuildError> {
        self.add_directive(Directive::DialogElicitSlot(DialogElicitSlotDirective {
            slot_to_elicit: slot_to_elicit.into(),
            updated_intent,
        }))
    }

    pub fn add_confirm_slot_directive(
        &mut self,
        slot_to_confirm: impl Into<String>,
        updated_intent: Option<Intent>,
    ) -> Result<&mut Self, ResponseBuildError> {
        self.add_directive(Directive::DialogConfirmSlot(DialogConfirmSlotDirective {
            slot_to_confirm: slot_to_confirm.into(),
            updated_intent,
        }))
    }

    pub fn add_confirm_intent_directive(&mut self, updated_intent: Option<Intent>) -> &mut Self {
        self.push_directive(Directive::DialogConfirmIntent(DialogConfirmIntentDirective {
            updated_intent,
        }))
    }

    pub fn add_audio_player_play_directive(
        &mut self,
        play_behavior: PlayBehavior,
        url: impl Into<String>,
        token: impl Into<String>,
        offset_in_milliseconds: i64,
        expected_previous_token: Option<String>,
        metadata: Option<AudioItemMetadata>,
    ) -> Result<&mut Self, ResponseBuildError> {
        self.add_directive(Directive::AudioPlayerPlay(AudioPlayerPlayDirective {
            play_behavior,
            audio_item: AudioItem {
                stream: AudioStream {
                    url: url.into(),
                    token: token.into(),
                    expected_previous_token,
                    offset_in_milliseconds,
                },
                metadata,
            },
        }))
    }

    pub fn add_audio_player_stop_directive(&mut self) -> &mut Self {
        self.push_directive(Directive::AudioPlayerStop)
    }

    pub fn add_audio_player_clear_queue_directive(
        &mut self,
        clear_behavior: ClearBehavior,
    ) -> &mut Self {
        self.push_directive(Directive::AudioPlayerClearQueue(
            AudioPlayerClearQueueDirective { clear_behavior },
        ))
    }

    pub fn add_render_template_directive(
        &mut self,
        template: DisplayTemplate,
    ) -> Result<&mut Self, ResponseBuildError> {
        self.add_directive(Directive::DisplayRenderTemplate(
            DisplayRenderTemplateDirective { template },
        ))
    }

    pub fn add_hint_directive(
        &mut self,
        text: impl Into<String>,
    ) -> Result<&mut Self, ResponseBuildError> {
        self.add_directive(Directive::Hint(HintDirective {
            hint: Hint::PlainText { text: text.into() },
        }))
    }

    /// Launch a video. Forces the session to stay open from here on.
    pub fn add_video_app_launch_directive(
        &mut self,
        source: impl Into<String>,
        title: Option<String>,
        subtitle: Option<String>,
    ) -> Result<&mut Self, ResponseBuildError> {
        let metadata = if title.is_some() || subtitle.is_some() {
            Some(VideoItemMetadata { title, subtitle })
        } else {
            None
        };
        self.add_directive(Directive::VideoAppLaunch(VideoAppLaunchDirective {
            video_item: VideoItem {
                source: source.into(),
                metadata,
            },
        }))
    }

    /// Append a pre-built directive after checking its required fields.
    pub fn add_directive(
        &mut self,
        directive: Directive,
    ) -> Result<&mut Self, ResponseBuildError> {
        validate_directive(&directive)?;
        Ok(self.push_directive(directive))
    }

    fn push_directive(&mut self, directive: Directive) -> &mut Self {
        let response = &mut self.envelope.response;
        if directive.is_video_app_launch() {
            response.should_end_session = false;
        }
        response.directives.push(directive);
        self
    }

    /// Set the end-session flag. No-op once a video launch has been added.
    pub fn with_should_end_session(&mut self, should_end_session: bool) -> &mut Self {
        if self.has_video_app_launch() {
            tracing::debug!(
                should_end_session,
                "ignoring end-session flag: response launches a video"
            );
            return self;
        }
        self.envelope.response.should_end_session = should_end_session;
        self
    }

    pub fn has_video_app_launch(&self) -> bool {
        self.envelope
            .response
            .directives
            .iter()
            .any(Directive::is_video_app_launch)
    }

    pub fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }

    /// Snapshot of the accumulated envelope. Does not reset the builder.
    pub fn build(&self) -> ResponseEnvelope {
        self.envelope.clone()
    }
}

fn ssml(speech: &str) -> OutputSpeech {
    OutputSpeech::Ssml {
        ssml: wrap_speech(speech),
    }
}

fn require(
    value: &str,
    directive: &'static str,
    field: &'static str,
) -> Result<(), ResponseBuildError> {
    if value.trim().is_empty() {
        return Err(ResponseBuildError::MissingField { directive, field });
    }
    Ok(())
}

fn validate_directive(directive: &Directive) -> Result<(), ResponseBuildError> {
    let name = directive.type_name();
    match directive {
        Directive::DialogElicitSlot(d) => require(&d.slot_to_elicit, name, "slotToElicit"),
        Directive::DialogConfirmSlot(d) => require(&d.slot_to_confirm, name, "slotToConfirm"),
        Directive::AudioPlayerPlay(d) => {
            require(&d.audio_item.stream.url, name, "url")?;
            require(&d.audio_item.stream.token, name, "token")
        }
        Directive::DisplayRenderTemplate(d) => {
            require(&d.template.template_type, name, "template.type")
        }
        Directive::Hint(d) => match &d.hint {
            Hint::PlainText { text } => require(text, name, "hint.text"),
        },
        Directive::VideoAppLaunch(d) => require(&d.video_item.source, name, "videoItem.source"),
        Directive::DialogDelegate(_)
        | Directive::DialogConfirmIntent(_)
        | Directive::AudioPlayerStop
        | Directive::AudioPlayerClearQueue(_) => Ok(()),
    }
}
