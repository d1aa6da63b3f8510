use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use validator::Validate;

use crate::error::{MailGenieError, Result};

/// Writing style applied to a generated reply.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Formal,
    Friendly,
    Concise,
    Empathetic,
    #[default]
    Professional,
    Casual,
    Urgent,
    Apologetic,
    Persuasive,
    Enthusiastic,
    Diplomatic,
    Analytical,
    Supportive,
    Reassuring,
    Assertive,
    Appreciative,
    Instructional,
    Humorous,
    Inspirational,
    Neutral,
    Technical,
    Legal,
    Sales,
    Clarifying,
    Followup,
    Celebratory,
}

impl Tone {
    /// Parses a caller-supplied tone name. Unknown names are rejected, never coerced.
    pub fn parse(value: &str) -> Result<Self> {
        Tone::from_str(value).map_err(|_| {
            let available: Vec<String> = Tone::iter().map(|t| t.to_string()).collect();
            MailGenieError::Input(format!(
                "Invalid tone '{}'. Available tones: {}",
                value,
                available.join(", ")
            ))
        })
    }

    /// Display label, e.g. `Followup`.
    pub fn label(&self) -> String {
        let name = self.as_ref();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReplyLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FormalityLevel {
    Casual,
    Neutral,
    Formal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[validate(length(min = 1, message = "Email content is required"))]
    pub email_content: String,
    pub tone: Option<Tone>,
    pub context: Option<String>,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub length: Option<ReplyLength>,
    pub include_bullets: Option<bool>,
    pub include_subject: Option<bool>,
    pub call_to_action: Option<String>,
    pub include_references: Option<bool>,
    pub formality_level: Option<FormalityLevel>,
    #[validate(length(max = 64))]
    pub language: Option<String>,
    pub include_signature: Option<bool>,
    pub custom_instructions: Option<String>,
}

impl ReplyRequest {
    pub fn new(email_content: impl Into<String>) -> Self {
        Self {
            email_content: email_content.into(),
            ..Default::default()
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResult {
    pub reply: String,
    pub detected_tone: Tone,
    pub confidence: f32,
    pub is_fallback: bool,
}

impl ReplyResult {
    pub fn generated(reply: String, tone: Tone, confidence: f32) -> Self {
        Self {
            reply,
            detected_tone: tone,
            confidence: clamp_confidence(confidence),
            is_fallback: false,
        }
    }

    pub fn fallback(reply: String, tone: Tone, confidence: f32) -> Self {
        Self {
            reply,
            detected_tone: tone,
            confidence: clamp_confidence(confidence),
            is_fallback: true,
        }
    }
}

/// Tone chosen for a generation: either supplied by the caller or classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedTone {
    Explicit(Tone),
    Detected { tone: Tone, confidence: f32 },
}

impl ResolvedTone {
    pub fn tone(&self) -> Tone {
        match self {
            ResolvedTone::Explicit(tone) => *tone,
            ResolvedTone::Detected { tone, .. } => *tone,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            ResolvedTone::Explicit(_) => 1.0,
            ResolvedTone::Detected { confidence, .. } => *confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneDetection {
    pub tone: Tone,
    pub confidence: f32,
}

impl ToneDetection {
    pub fn new(tone: Tone, confidence: f32) -> Self {
        Self {
            tone,
            confidence: clamp_confidence(confidence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneInfo {
    pub value: Tone,
    pub label: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub user_id: String,
    pub email_content: String,
    pub tone: String,
    pub reply: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub tone: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            tone: None,
            search: None,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub history: Vec<HistoryItem>,
    pub pagination: Pagination,
}

pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
