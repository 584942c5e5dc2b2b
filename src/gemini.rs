//! Blocking Gemini client for `models/{model}:generateContent`.
//!
//! One request per call, no retry, no streaming. The HTTP agent carries the
//! configured timeout; nothing above this layer enforces one.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::UlamError;

/// Default model, matching the product's original choice.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Base URL for the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The external text-generation capability.
///
/// The orchestrator and the interactive session are generic over this trait
/// so they can be driven by a scripted fake in tests.
pub trait TextGenerator {
    /// Single-attempt generation. Any failure collapses into `UlamError`;
    /// callers other than recipe fetch never inspect which kind.
    fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, UlamError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Always sent; the original service grounds suggestions with search.
#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Blocking HTTPS client for the Gemini API.
#[derive(Debug)]
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client. Fails with `MissingApiKey` when the key is blank so
    /// the first interactive request does not have to.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, UlamError> {
        if api_key.trim().is_empty() {
            return Err(UlamError::MissingApiKey);
        }
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self {
            agent,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(prompt: &str, system_instruction: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction.to_owned(),
                }],
            },
            tools: vec![Tool {
                google_search: serde_json::Map::new(),
            }],
        }
    }

    fn extract_text(response: GenerateResponse) -> Result<String, UlamError> {
        if let Some(error) = response.error {
            return Err(UlamError::ApiError {
                message: error.message,
            });
        }
        response
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|mut content| {
                if content.parts.is_empty() {
                    None
                } else {
                    Some(content.parts.remove(0).text)
                }
            })
            .ok_or_else(|| UlamError::MalformedResponse {
                detail: "no text in first candidate".to_owned(),
            })
    }

    /// Try to pull the service's human-readable message out of an error
    /// body; fall back to a bounded snippet of the raw body.
    fn error_detail(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<GenerateResponse>(body) {
            if let Some(error) = parsed.error {
                return error.message;
            }
        }
        let snippet: String = body.chars().take(200).collect();
        snippet
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, UlamError> {
        let payload = Self::build_request(prompt, system_instruction);
        debug!(model = %self.model, prompt_len = prompt.len(), "sending generate request");

        let response = match self.agent.post(&self.url()).send_json(&payload) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                let detail = Self::error_detail(&body);
                warn!(status, detail = %detail, "generate request rejected");
                return Err(UlamError::RequestFailed { status, detail });
            }
            Err(ureq::Error::Transport(err)) => {
                warn!(err = %err, "generate request transport failure");
                return Err(UlamError::Transport {
                    detail: err.to_string(),
                });
            }
        };

        let parsed: GenerateResponse =
            response
                .into_json()
                .map_err(|e| UlamError::MalformedResponse {
                    detail: e.to_string(),
                })?;

        let text = Self::extract_text(parsed)?;
        debug!(reply_len = text.len(), "generate request succeeded");
        Ok(text)
    }
}
