use ai::provider::{AiProvider, ChatRequest, ResponseFormat};
use ai::schema::ToneDetectionValidator;
use mailgenie_core::error::Result;
use mailgenie_core::types::{Tone, ToneDetection};
use std::sync::Arc;
use tracing::{debug, warn};

const DETECT_MAX_TOKENS: u32 = 150;
const DETECT_TEMPERATURE: f32 = 0.0;

const DETECT_SYSTEM_PROMPT: &str = "You are an expert at analyzing email tone and sentiment. Analyze the given email and determine its tone. Consider factors like formality level, emotional content, urgency, and relationship context. Respond with ONLY a JSON object containing 'tone' (one of: formal, friendly, concise, empathetic, professional, casual, urgent, apologetic) and 'confidence' (a number between 0 and 1).";

/// Keyword ladder used whenever the classifier cannot be used. First match wins.
pub fn heuristic_tone(email_content: &str) -> ToneDetection {
    let content = email_content.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| content.contains(w));

    if mentions(&["urgent", "asap", "immediately"]) {
        ToneDetection::new(Tone::Urgent, 0.8)
    } else if mentions(&["sorry", "apologize", "regret"]) {
        ToneDetection::new(Tone::Apologetic, 0.8)
    } else if mentions(&["thanks", "appreciate", "grateful"]) {
        ToneDetection::new(Tone::Friendly, 0.7)
    } else if content.chars().count() < 100 {
        ToneDetection::new(Tone::Concise, 0.6)
    } else {
        ToneDetection::new(Tone::Professional, 0.5)
    }
}

pub struct ToneDetector {
    ai: Arc<dyn AiProvider>,
    validator: ToneDetectionValidator,
    model: Option<String>,
}

impl ToneDetector {
    pub fn new(ai: Arc<dyn AiProvider>, model: Option<String>) -> Result<Self> {
        Ok(Self {
            ai,
            validator: ToneDetectionValidator::new()?,
            model,
        })
    }

    /// Never fails: any backend problem degrades to [`heuristic_tone`].
    pub async fn detect(&self, email_content: &str) -> ToneDetection {
        match self.classify(email_content).await {
            Ok(detection) => {
                debug!(tone = %detection.tone, confidence = detection.confidence, "Backend classified tone");
                detection
            }
            Err(e) => {
                warn!("Tone detection via {} failed, using keyword heuristics: {}", self.ai.name(), e);
                heuristic_tone(email_content)
            }
        }
    }

    async fn classify(&self, email_content: &str) -> Result<ToneDetection> {
        let prompt = format!(
            "Analyze the tone of this email:\n\n{}\n\nConsider the language used, emotional content, formality level, and context to determine the most appropriate tone classification.",
            email_content
        );

        let mut request = ChatRequest::new(DETECT_SYSTEM_PROMPT, &prompt, DETECT_TEMPERATURE)
            .with_max_tokens(DETECT_MAX_TOKENS)
            .with_response_format(ResponseFormat::Json);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = self.ai.chat_completion(request).await?;
        self.validator.parse(&response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgent_keywords_take_priority() {
        let d = heuristic_tone("This is URGENT, need ASAP response. Sorry and thanks!");
        assert_eq!(d.tone, Tone::Urgent);
        assert_eq!(d.confidence, 0.8);
    }

    #[test]
    fn test_apology_beats_gratitude() {
        let d = heuristic_tone("I regret the delay, thanks for waiting");
        assert_eq!(d.tone, Tone::Apologetic);
        assert_eq!(d.confidence, 0.8);
    }

    #[test]
    fn test_gratitude_is_friendly() {
        let d = heuristic_tone("Thanks so much, really appreciate it");
        assert_eq!(d.tone, Tone::Friendly);
        assert_eq!(d.confidence, 0.7);
    }

    #[test]
    fn test_short_text_is_concise() {
        let text = "Can we move the meeting to 3pm Tuesday?";
        let d = heuristic_tone(text);
        assert_eq!(d.tone, Tone::Concise);
        assert_eq!(d.confidence, 0.6);

        let empty = heuristic_tone("");
        assert_eq!(empty.tone, Tone::Concise);
    }

    #[test]
    fn test_long_neutral_text_is_professional() {
        let text = "Please find the revised project plan attached. ".repeat(4);
        assert!(text.len() >= 100);
        let d = heuristic_tone(&text);
        assert_eq!(d.tone, Tone::Professional);
        assert_eq!(d.confidence, 0.5);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let text = "é".repeat(99);
        assert_eq!(heuristic_tone(&text).tone, Tone::Concise);
    }
}
