pub mod detect;
pub mod draft;
pub mod fallback;

use ai::provider::AiProvider;
use mailgenie_core::error::Result;
use mailgenie_core::types::{ReplyRequest, ReplyResult, ResolvedTone, ToneDetection};
use std::sync::Arc;
use tracing::{info, warn};

use self::detect::{heuristic_tone, ToneDetector};
use self::draft::ReplyGenerator;
use self::fallback::FallbackSelector;

struct LiveBackend {
    detector: ToneDetector,
    generator: ReplyGenerator,
}

/// Tone resolution, generation and fallback for a single request. Holds no
/// per-request state, so one instance serves concurrent callers.
pub struct ReplyPipeline {
    live: Option<LiveBackend>,
    fallback: FallbackSelector,
}

impl ReplyPipeline {
    /// `ai` is `None` when the backend is not configured; every reply is then
    /// served from templates without a network attempt.
    pub fn new(ai: Option<Arc<dyn AiProvider>>, detect_model: Option<String>) -> Result<Self> {
        let live = match ai {
            Some(ai) => Some(LiveBackend {
                detector: ToneDetector::new(ai.clone(), detect_model)?,
                generator: ReplyGenerator::new(ai),
            }),
            None => None,
        };

        Ok(Self {
            live,
            fallback: FallbackSelector::new(),
        })
    }

    pub fn offline() -> Self {
        Self {
            live: None,
            fallback: FallbackSelector::new(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackSelector) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn is_backend_configured(&self) -> bool {
        self.live.is_some()
    }

    pub fn fallback(&self) -> &FallbackSelector {
        &self.fallback
    }

    pub async fn detect_tone(&self, email_content: &str) -> ToneDetection {
        match &self.live {
            Some(live) => live.detector.detect(email_content).await,
            None => heuristic_tone(email_content),
        }
    }

    /// Never fails. Any backend problem yields a template for the requested
    /// tone (or `professional`) with confidence 0.3.
    pub async fn generate_reply(&self, request: &ReplyRequest) -> ReplyResult {
        let Some(live) = &self.live else {
            info!("Generation backend not configured; serving fallback template");
            return self.fallback.select(request.tone);
        };

        let resolved = match request.tone {
            Some(tone) => ResolvedTone::Explicit(tone),
            None => {
                let detection = live.detector.detect(&request.email_content).await;
                ResolvedTone::Detected {
                    tone: detection.tone,
                    confidence: detection.confidence,
                }
            }
        };

        match live.generator.generate(request, resolved).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Reply generation failed, serving fallback template: {}", e);
                self.fallback.select(request.tone)
            }
        }
    }
}
