use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::providers::RecommendationSource,
};

pub const RECOMMENDATION_INTENT: &str = "MovieRecommendationIntent";
pub const MOVIE_NAME_SLOT: &str = "MovieName";

const WELCOME: &str =
    "Welcome to movie recommendations. Tell me a movie you like and I'll suggest similar ones.";
const HELP: &str = "Say something like: recommend movies like Toy Story.";
const REPROMPT: &str = "Which movie would you like recommendations for?";
const FALLBACK: &str = "Sorry, I can't help with that. Try asking for movies like one you enjoyed.";
const GOODBYE: &str = "Goodbye!";
pub const GENERIC_ERROR: &str = "Sorry, there was an error processing your request.";

// ============================================================================
// Request envelope
// ============================================================================

/// Incoming voice-assistant request envelope
#[derive(Debug, Clone, Deserialize)]
pub struct IntentEnvelope {
    pub request: VoiceRequest,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum VoiceRequest {
    LaunchRequest,
    IntentRequest { intent: Intent },
    SessionEndedRequest,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

impl Intent {
    /// Trimmed, non-empty slot value
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|s| s.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

// ============================================================================
// Response envelope
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl VoiceResponse {
    pub fn speak(text: impl Into<String>, end_session: bool) -> Self {
        Self {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: OutputSpeech {
                    speech_type: "PlainText".to_string(),
                    text: text.into(),
                },
                should_end_session: end_session,
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.response.output_speech.text
    }
}

/// Turns a lookup outcome into one speakable sentence. Errors never leak.
pub fn render_speech(item_name: &str, outcome: &AppResult<Vec<String>>) -> String {
    match outcome {
        Ok(titles) if !titles.is_empty() => format!(
            "Based on {}, I recommend you watch: {}",
            item_name,
            titles.join(", ")
        ),
        Ok(_) | Err(AppError::NotFound(_)) => format!(
            "Sorry, I couldn't find any recommendations for {}.",
            item_name
        ),
        Err(_) => GENERIC_ERROR.to_string(),
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Voice intent handler: slot in, one speech string out
#[derive(Clone)]
pub struct VoiceHandler {
    source: Arc<dyn RecommendationSource>,
}

impl VoiceHandler {
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self { source }
    }

    pub async fn handle(&self, envelope: IntentEnvelope) -> VoiceResponse {
        match envelope.request {
            VoiceRequest::LaunchRequest => VoiceResponse::speak(WELCOME, false),
            VoiceRequest::SessionEndedRequest => VoiceResponse::speak(GOODBYE, true),
            VoiceRequest::Unsupported => VoiceResponse::speak(FALLBACK, true),
            VoiceRequest::IntentRequest { intent } => self.handle_intent(&intent).await,
        }
    }

    async fn handle_intent(&self, intent: &Intent) -> VoiceResponse {
        match intent.name.as_str() {
            RECOMMENDATION_INTENT => match intent.slot_value(MOVIE_NAME_SLOT) {
                Some(item_name) => {
                    let text = self.recommend(item_name).await;
                    VoiceResponse::speak(text, true)
                }
                None => VoiceResponse::speak(REPROMPT, false),
            },
            "AMAZON.HelpIntent" => VoiceResponse::speak(HELP, false),
            "AMAZON.StopIntent" | "AMAZON.CancelIntent" => VoiceResponse::speak(GOODBYE, true),
            other => {
                tracing::debug!(intent = %other, "Unhandled voice intent");
                VoiceResponse::speak(FALLBACK, true)
            }
        }
    }

    async fn recommend(&self, item_name: &str) -> String {
        let outcome = self.source.recommend(item_name).await;

        match &outcome {
            Ok(titles) => tracing::info!(
                item = %item_name,
                source = self.source.name(),
                returned = titles.len(),
                "Voice recommendation served"
            ),
            Err(AppError::NotFound(_)) => tracing::info!(
                item = %item_name,
                source = self.source.name(),
                "Voice recommendation for unknown item"
            ),
            Err(e) => tracing::error!(
                item = %item_name,
                source = self.source.name(),
                error = %e,
                "Voice recommendation failed"
            ),
        }

        render_speech(item_name, &outcome)
    }
}
