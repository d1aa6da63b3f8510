use ai::provider::AiProvider;
use mailgenie_core::catalog;
use mailgenie_core::error::{MailGenieError, Result};
use mailgenie_core::types::{ReplyRequest, ReplyResult, ResolvedTone};
use std::sync::Arc;
use tracing::info;

pub const REPLY_MAX_TOKENS: u32 = 1000;
pub const REPLY_TEMPERATURE: f32 = 0.7;

const BASE_INSTRUCTION: &str = "Please generate an appropriate email reply to the following email content. The reply should be contextually relevant, well-structured, and match the requested tone perfectly.";

const CLOSING_CHECKLIST: &str = "Please ensure the reply is:\n- Contextually appropriate\n- Well-structured with proper greeting and closing\n- Professional yet approachable\n- Clear and actionable\n- Free of spelling and grammar errors";

/// Composes the user prompt. Each preference contributes a line only when it
/// was supplied; an empty string still counts as supplied.
pub fn build_user_prompt(request: &ReplyRequest) -> String {
    let mut sections: Vec<String> = vec![BASE_INSTRUCTION.to_string()];

    if let Some(context) = &request.context {
        sections.push(format!("Additional context: {}", context));
    }
    if let Some(sender) = &request.sender_name {
        sections.push(format!("Sender's name: {}", sender));
    }
    if let Some(recipient) = &request.recipient_name {
        sections.push(format!("Recipient's name: {}", recipient));
    }
    if let Some(formality) = request.formality_level {
        sections.push(format!("Desired formality level: {}", formality));
    }
    if let Some(length) = request.length {
        sections.push(format!("Preferred length: {}", length));
    }
    if request.include_bullets == Some(true) {
        sections.push("If appropriate, include bullet points for clarity.".to_string());
    }
    if request.include_subject == Some(true) {
        sections.push("Include a subject line at the top (Subject: ...).".to_string());
    }
    if let Some(cta) = &request.call_to_action {
        sections.push(format!("Call to action to include: {}", cta));
    }
    if request.include_references == Some(true) {
        sections.push(
            "If relevant, reference prior messages or agreements succinctly.".to_string(),
        );
    }
    if let Some(language) = &request.language {
        sections.push(format!("Write the reply in this language: {}", language));
    }
    if request.include_signature == Some(true) {
        sections.push("Include a simple professional signature block.".to_string());
    }
    if let Some(custom) = &request.custom_instructions {
        sections.push(format!("Additional custom instructions: {}", custom));
    }

    sections.push(format!("Email to reply to:\n{}", request.email_content));
    sections.push(CLOSING_CHECKLIST.to_string());

    sections.join("\n\n")
}

pub struct ReplyGenerator {
    ai: Arc<dyn AiProvider>,
}

impl ReplyGenerator {
    pub fn new(ai: Arc<dyn AiProvider>) -> Self {
        Self { ai }
    }

    /// One backend call, no retry. Errors are left to the caller to recover from.
    pub async fn generate(
        &self,
        request: &ReplyRequest,
        resolved: ResolvedTone,
    ) -> Result<ReplyResult> {
        let tone = resolved.tone();
        let prompt = build_user_prompt(request);

        let text = self
            .ai
            .complete(
                catalog::prompt_for(tone),
                &prompt,
                REPLY_MAX_TOKENS,
                REPLY_TEMPERATURE,
            )
            .await?;

        let reply = text.trim();
        if reply.is_empty() {
            return Err(MailGenieError::Backend(
                "Empty reply from generation backend".into(),
            ));
        }

        info!(%tone, provider = self.ai.name(), "Generated reply");
        Ok(ReplyResult::generated(
            reply.to_string(),
            tone,
            resolved.confidence(),
        ))
    }
}
