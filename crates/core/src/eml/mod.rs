use chrono::{DateTime, Utc};

use crate::error::{MailGenieError, Result};

pub const EML_FROM: &str = "user@mailgenie.com";
pub const EML_TO: &str = "recipient@example.com";
pub const EML_SUBJECT: &str = "Re: Email Reply";
pub const EML_FILENAME: &str = "email-reply.eml";

/// Wraps a reply in a minimal RFC 822 message that mail clients can open.
pub fn to_eml(reply: &str, date: DateTime<Utc>) -> Result<String> {
    if reply.trim().is_empty() {
        return Err(MailGenieError::Input("Reply content is required".into()));
    }

    Ok(format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{}\r\n",
        EML_FROM,
        EML_TO,
        EML_SUBJECT,
        date.to_rfc2822(),
        reply.replace("\r\n", "\n").replace('\n', "\r\n")
    ))
}
