use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::SummaryConfig;

/// Instruction prepended to the memo body. The model is asked for the key
/// points only, in two or three sentences.
const SUMMARY_PROMPT: &str =
    "Summarize the following memo clearly and concisely. \
     Keep only the key points, in two or three sentences:";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Memo content is empty")]
    EmptyContent,
    #[error("Failed to reach the summarization service")]
    Transport(#[from] reqwest::Error),
    #[error("Summarization service returned status {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("Summarization service returned no usable text")]
    EmptyResponse,
}

/// Client for the generative text API used to summarize memo content.
/// One request per summary; no retries and no streaming.
pub struct SummaryClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl SummaryClient {
    pub fn new(api_key: String, config: &SummaryConfig) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Ask the model for a short summary of a memo body. Empty content is
    /// rejected before any network call.
    pub fn summarize(&self, content: &str) -> Result<String, SummaryError> {
        if content.trim().is_empty() {
            return Err(SummaryError::EmptyContent);
        }

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{SUMMARY_PROMPT}\n\n{content}"),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            log::error!("summary request failed with status {status}");
            return Err(SummaryError::BadStatus(status));
        }

        let parsed: GenerateResponse = response.json()?;
        parsed
            .candidates
            .into_iter()
            .flat_map(|c| c.content.into_iter())
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .find(|text| !text.trim().is_empty())
            .ok_or(SummaryError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SummaryClient {
        SummaryClient::new("test-key".to_string(), &SummaryConfig::default()).unwrap()
    }

    #[test]
    fn empty_content_is_rejected_without_a_request() {
        let err = client().summarize("   \n ").unwrap_err();
        assert!(matches!(err, SummaryError::EmptyContent));
    }

    #[test]
    fn request_body_carries_prompt_and_content() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{SUMMARY_PROMPT}\n\nbuy milk"),
                }],
            }],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("buy milk"));
        assert!(json.contains("two or three sentences"));
        assert!(json.starts_with("{\"contents\":"));
    }

    #[test]
    fn response_text_is_extracted_from_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "A short summary."}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .flat_map(|c| c.content.into_iter())
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty());
        assert_eq!(text.as_deref(), Some("A short summary."));
    }

    #[test]
    fn candidates_default_to_empty_when_missing() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
