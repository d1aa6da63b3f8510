use crate::pipeline::ReplyPipeline;
use ai::config::ConfigReport;
use mailgenie_core::catalog;
use mailgenie_core::error::{MailGenieError, Result};
use mailgenie_core::types::{ReplyRequest, ReplyResult, Tone, ToneDetection, ToneInfo};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use storage::HistoryRecorder;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};
use validator::Validate;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const NOT_CONFIGURED_NOTICE: &str = "Using fallback response. To get AI-powered replies, configure OPENAI_API_KEY.";
const GENERATION_FAILED_NOTICE: &str = "AI generation is temporarily unavailable. Using fallback response.";
const TOTAL_FAILURE_NOTICE: &str = "An error occurred. Using fallback response. Please check your configuration and try again.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    #[serde(flatten)]
    pub result: ReplyResult,
    pub available_tones: Vec<ToneInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

struct PipelineOutcome {
    result: ReplyResult,
    message: Option<String>,
    // False when the pipeline timed out or panicked
    completed: bool,
}

/// Caller-facing entry point: validates input, bounds pipeline latency and
/// hands finished replies to the history recorder.
pub struct ReplyService {
    pipeline: Arc<ReplyPipeline>,
    history: Option<Arc<dyn HistoryRecorder>>,
    request_timeout: Duration,
    config_report: ConfigReport,
}

impl ReplyService {
    pub fn new(pipeline: Arc<ReplyPipeline>, config_report: ConfigReport) -> Self {
        Self {
            pipeline,
            history: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            config_report,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryRecorder>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn validate(request: &ReplyRequest) -> Result<()> {
        if request.email_content.trim().is_empty() {
            return Err(MailGenieError::Input("Email content is required".into()));
        }
        request.validate()?;
        Ok(())
    }

    pub fn parse_tone(value: &str) -> Result<Tone> {
        Tone::parse(value)
    }

    pub fn list_tones() -> Vec<ToneInfo> {
        catalog::tone_infos()
    }

    pub fn config_report(&self) -> &ConfigReport {
        &self.config_report
    }

    pub async fn detect_tone(&self, email_content: &str) -> ToneDetection {
        self.pipeline.detect_tone(email_content).await
    }

    /// Only input errors are returned; backend trouble always yields a reply.
    /// The history write, if any, runs detached.
    pub async fn generate(&self, user_id: Option<&str>, request: ReplyRequest) -> Result<ReplyResponse> {
        let (response, _history) = self.generate_tracked(user_id, request).await?;
        Ok(response)
    }

    /// Like [`generate`](Self::generate), also handing back the history write
    /// so short-lived callers can await it before shutting the runtime down.
    pub async fn generate_tracked(
        &self,
        user_id: Option<&str>,
        request: ReplyRequest,
    ) -> Result<(ReplyResponse, Option<JoinHandle<()>>)> {
        Self::validate(&request)?;

        let outcome = self.run_pipeline(&request).await;
        info!(
            tone = %outcome.result.detected_tone,
            confidence = outcome.result.confidence,
            fallback = outcome.result.is_fallback,
            "Reply ready"
        );

        // Total failures are never persisted
        let history = match user_id {
            Some(user_id) if outcome.completed => {
                self.record_history(user_id, &request.email_content, &outcome.result)
            }
            _ => None,
        };

        let response = ReplyResponse {
            result: outcome.result,
            available_tones: Self::list_tones(),
            message: outcome.message,
        };
        Ok((response, history))
    }

    async fn run_pipeline(&self, request: &ReplyRequest) -> PipelineOutcome {
        let pipeline = self.pipeline.clone();
        let owned = request.clone();
        let mut handle = tokio::spawn(async move { pipeline.generate_reply(&owned).await });

        match timeout(self.request_timeout, &mut handle).await {
            Ok(Ok(result)) => {
                let message = if !result.is_fallback {
                    None
                } else if self.pipeline.is_backend_configured() {
                    Some(GENERATION_FAILED_NOTICE.to_string())
                } else {
                    Some(NOT_CONFIGURED_NOTICE.to_string())
                };
                PipelineOutcome {
                    result,
                    message,
                    completed: true,
                }
            }
            Ok(Err(e)) => {
                error!("Reply pipeline task failed: {}", e);
                self.total_failure()
            }
            Err(_) => {
                handle.abort();
                warn!("Reply pipeline exceeded {:?}", self.request_timeout);
                self.total_failure()
            }
        }
    }

    fn total_failure(&self) -> PipelineOutcome {
        PipelineOutcome {
            result: self.pipeline.fallback().total_failure(),
            message: Some(TOTAL_FAILURE_NOTICE.to_string()),
            completed: false,
        }
    }

    fn record_history(
        &self,
        user_id: &str,
        email_content: &str,
        result: &ReplyResult,
    ) -> Option<JoinHandle<()>> {
        let history = self.history.clone()?;

        let user_id = user_id.to_string();
        let email_content = email_content.to_string();
        let tone = result.detected_tone;
        let reply = result.reply.clone();

        Some(tokio::spawn(async move {
            if let Err(e) = history.record(&user_id, &email_content, tone, &reply).await {
                error!("Failed to record history for {}: {}", user_id, e);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fallback::FallbackSelector;
    use mailgenie_core::types::HistoryItem;
    use tokio::sync::mpsc;

    struct ChannelRecorder {
        tx: mpsc::UnboundedSender<(String, Tone, String)>,
    }

    #[async_trait::async_trait]
    impl HistoryRecorder for ChannelRecorder {
        async fn record(
            &self,
            user_id: &str,
            email_content: &str,
            tone: Tone,
            reply: &str,
        ) -> Result<HistoryItem> {
            let _ = self.tx.send((user_id.to_string(), tone, reply.to_string()));
            Ok(HistoryItem {
                id: "1".into(),
                user_id: user_id.into(),
                email_content: email_content.into(),
                tone: tone.to_string(),
                reply: reply.into(),
                created_at: "2024-01-01T00:00:00.000Z".into(),
            })
        }
    }

    fn offline_service() -> ReplyService {
        let pipeline = ReplyPipeline::offline().with_fallback(FallbackSelector::seeded(5));
        ReplyService::new(Arc::new(pipeline), ConfigReport::from_key(None))
    }

    #[tokio::test]
    async fn test_empty_email_is_input_error() {
        let service = offline_service();
        for content in ["", "   \n"] {
            let err = service
                .generate(None, ReplyRequest::new(content))
                .await
                .unwrap_err();
            assert!(matches!(err, MailGenieError::Input(_)));
        }
    }

    #[tokio::test]
    async fn test_overlong_language_is_validation_error() {
        let service = offline_service();
        let mut request = ReplyRequest::new("Hello");
        request.language = Some("x".repeat(65));
        let err = service.generate(None, request).await.unwrap_err();
        assert!(matches!(err, MailGenieError::Validation(_)));
    }

    #[test]
    fn test_unknown_tone_rejected_at_boundary() {
        let err = ReplyService::parse_tone("grumpy").unwrap_err();
        assert!(matches!(err, MailGenieError::Input(_)));
        assert_eq!(ReplyService::parse_tone("legal").unwrap(), Tone::Legal);
    }

    #[tokio::test]
    async fn test_unconfigured_backend_serves_fallback_with_notice() {
        let service = offline_service();
        let response = service
            .generate(None, ReplyRequest::new("Hi there").with_tone(Tone::Legal))
            .await
            .unwrap();

        assert!(response.result.is_fallback);
        assert_eq!(response.result.detected_tone, Tone::Legal);
        assert_eq!(response.result.confidence, 0.3);
        assert_eq!(response.message.as_deref(), Some(NOT_CONFIGURED_NOTICE));
        assert_eq!(response.available_tones.len(), 26);
    }

    #[tokio::test]
    async fn test_response_serializes_flat() {
        let service = offline_service();
        let response = service
            .generate(None, ReplyRequest::new("Hi"))
            .await
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["detectedTone"], "professional");
        assert_eq!(json["isFallback"], true);
        assert!(json["availableTones"].is_array());
        assert_eq!(json["availableTones"][0]["label"], "Formal");
    }

    #[tokio::test]
    async fn test_history_recorded_for_identified_user() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = offline_service().with_history(Arc::new(ChannelRecorder { tx }));

        let response = service
            .generate(Some("u42"), ReplyRequest::new("Thanks!").with_tone(Tone::Friendly))
            .await
            .unwrap();

        let (user, tone, reply) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user, "u42");
        assert_eq!(tone, Tone::Friendly);
        assert_eq!(reply, response.result.reply);
    }

    #[tokio::test]
    async fn test_tracked_history_write_can_be_awaited() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = offline_service().with_history(Arc::new(ChannelRecorder { tx }));

        let (_, handle) = service
            .generate_tracked(Some("u7"), ReplyRequest::new("Same email again"))
            .await
            .unwrap();
        handle.expect("history write for identified user").await.unwrap();

        let (user, _, _) = rx.try_recv().unwrap();
        assert_eq!(user, "u7");

        let (_, anonymous) = service
            .generate_tracked(None, ReplyRequest::new("Hello"))
            .await
            .unwrap();
        assert!(anonymous.is_none());
    }

    #[tokio::test]
    async fn test_anonymous_request_is_not_recorded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = offline_service().with_history(Arc::new(ChannelRecorder { tx }));

        service
            .generate(None, ReplyRequest::new("Hello"))
            .await
            .unwrap();

        drop(service);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_config_report_passthrough() {
        let service = offline_service();
        assert!(!service.config_report().configured);
    }
}
