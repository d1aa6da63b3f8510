use jsonschema::JSONSchema;
use mailgenie_core::error::{MailGenieError, Result};
use mailgenie_core::types::{Tone, ToneDetection};
use serde_json::Value;
use strum::IntoEnumIterator;

/// Confidence assumed when the backend omits it or reports zero.
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.7;

/// Checks the `{tone, confidence}` object returned by the tone classifier.
pub struct ToneDetectionValidator {
    schema: JSONSchema,
}

impl ToneDetectionValidator {
    pub fn new() -> Result<Self> {
        let tones: Vec<String> = Tone::iter().map(|t| t.to_string()).collect();
        let schema_json = serde_json::json!({
            "type": "object",
            "properties": {
                "tone": { "type": "string", "enum": tones },
                "confidence": { "type": ["number", "null"] }
            },
            "required": ["tone"]
        });

        let schema = JSONSchema::compile(&schema_json)
            .map_err(|e| MailGenieError::Internal(format!("Invalid detection schema: {}", e)))?;
        Ok(Self { schema })
    }

    pub fn validate(&self, json: &Value) -> bool {
        self.schema.is_valid(json)
    }

    /// Parses raw classifier output. Anything that is not a schema-valid
    /// object naming a known tone is a backend error.
    pub fn parse(&self, raw: &str) -> Result<ToneDetection> {
        let json: Value = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| MailGenieError::Backend(format!("Unparseable tone detection: {}", e)))?;

        if !self.validate(&json) {
            return Err(MailGenieError::Backend(format!(
                "Tone detection failed validation: {}",
                json
            )));
        }

        let tone: Tone = serde_json::from_value(json["tone"].clone())
            .map_err(|e| MailGenieError::Backend(e.to_string()))?;

        let confidence = match json["confidence"].as_f64() {
            Some(c) if c != 0.0 && c.is_finite() => c as f32,
            _ => DEFAULT_DETECTION_CONFIDENCE,
        };

        Ok(ToneDetection::new(tone, confidence))
    }
}

/// Models sometimes wrap JSON in a markdown fence despite being told not to.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ToneDetectionValidator {
        ToneDetectionValidator::new().unwrap()
    }

    #[test]
    fn test_parse_valid_detection() {
        let detection = validator()
            .parse(r#"{"tone": "empathetic", "confidence": 0.92}"#)
            .unwrap();
        assert_eq!(detection.tone, Tone::Empathetic);
        assert!((detection.confidence - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_parse_accepts_tones_beyond_prompt_list() {
        let detection = validator()
            .parse(r#"{"tone": "celebratory", "confidence": 0.6}"#)
            .unwrap();
        assert_eq!(detection.tone, Tone::Celebratory);
    }

    #[test]
    fn test_missing_or_zero_confidence_defaults() {
        let v = validator();
        assert_eq!(v.parse(r#"{"tone": "formal"}"#).unwrap().confidence, 0.7);
        assert_eq!(
            v.parse(r#"{"tone": "formal", "confidence": 0}"#).unwrap().confidence,
            0.7
        );
    }

    #[test]
    fn test_confidence_is_clamped() {
        let v = validator();
        assert_eq!(
            v.parse(r#"{"tone": "urgent", "confidence": 3.5}"#).unwrap().confidence,
            1.0
        );
        assert_eq!(
            v.parse(r#"{"tone": "urgent", "confidence": -1}"#).unwrap().confidence,
            0.0
        );
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let raw = "```json\n{\"tone\": \"casual\", \"confidence\": 0.5}\n```";
        assert_eq!(validator().parse(raw).unwrap().tone, Tone::Casual);
    }

    #[test]
    fn test_rejects_unknown_tone_and_garbage() {
        let v = validator();
        for raw in [
            r#"{"tone": "angry", "confidence": 0.9}"#,
            r#"{"confidence": 0.9}"#,
            r#"{"tone": "formal", "confidence": "high"}"#,
            "The tone is formal.",
            "",
        ] {
            let err = v.parse(raw).unwrap_err();
            assert!(matches!(err, MailGenieError::Backend(_)), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json {} ```"), "{}");
    }
}
