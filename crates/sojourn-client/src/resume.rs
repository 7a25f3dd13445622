//! Resume auto-fill over the parse endpoint.
//!
//! Sends free text to `/api/parse-resume` and returns the partial profile
//! the server extracted. The form layer decides which fields actually get
//! applied (merge-not-overwrite); this client only performs the exchange.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sojourn_core::types::ResumeProfile;

use crate::config::{ClientConfig, RESUME_TEXT_LIMIT};
use crate::error::{ClientError, Result};

/// Request body for the parse endpoint.
#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

/// Response envelope from the parse endpoint.
///
/// Absence of `success` or of `data` is treated uniformly as failure.
#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ResumeProfile>,
}

/// Client for the resume parse endpoint.
pub struct ResumeClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ResumeClient {
    /// Create a client from config.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.resume_timeout_secs))
            .build()
            .map_err(|e| ClientError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Parse resume text into a partial profile.
    ///
    /// Text beyond the 5000-character endpoint bound is truncated on a char
    /// boundary before sending.
    pub async fn parse_resume(&self, text: &str) -> Result<ResumeProfile> {
        let text = truncate_chars(text, RESUME_TEXT_LIMIT);
        let url = format!("{}/api/parse-resume", self.config.base_url);
        debug!(%url, text_len = text.len(), "submitting resume for parsing");

        let response = self
            .client
            .post(&url)
            .json(&ParseRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ParseResponse = response.json().await?;
        match parsed {
            ParseResponse {
                success: true,
                data: Some(profile),
            } => Ok(profile),
            _ => Err(ClientError::ResumeRejected(
                "server returned no profile data".to_string(),
            )),
        }
    }
}

/// Truncate to at most `limit` characters without splitting a char.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 5000), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_at_limit() {
        let long = "a".repeat(6000);
        assert_eq!(truncate_chars(&long, 5000).len(), 5000);
    }

    #[test]
    fn test_truncate_chars_respects_char_boundary() {
        let text = "é".repeat(10);
        let cut = truncate_chars(&text, 5);
        assert_eq!(cut.chars().count(), 5);
    }

    #[test]
    fn test_parse_response_defaults_to_failure_shape() {
        let parsed: ParseResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
    }
}
