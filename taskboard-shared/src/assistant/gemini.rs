/// Gemini completion backend
///
/// Calls the `models/{model}:generateContent` REST endpoint with a single
/// text prompt built from the digest and joins the text parts of the first
/// candidate.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::assistant::gemini::{GeminiAssistant, GeminiConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let assistant = GeminiAssistant::new(GeminiConfig {
///     api_key: std::env::var("GEMINI_API_KEY")?,
///     ..Default::default()
/// })?;
/// # Ok(())
/// # }
/// ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Assistant, AssistantError, AssistantResult, BoardDigest};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// API root, without trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiAssistant {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn complete(&self, prompt: &str) -> AssistantResult<String> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(AssistantError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        body.into_text().ok_or(AssistantError::EmptyResponse)
    }
}

fn summary_prompt(digest: &BoardDigest) -> String {
    format!(
        "Summarize the following project board concisely. Mention key tasks, \
         progress across columns and anything notable.\n\n{}",
        digest.render()
    )
}

fn question_prompt(digest: &BoardDigest, question: &str) -> String {
    format!(
        "{}\nQuestion: {}\n\nAnswer using the project context above.",
        digest.render(),
        question
    )
}

#[async_trait]
impl Assistant for GeminiAssistant {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn summarize(&self, digest: &BoardDigest) -> AssistantResult<String> {
        self.complete(&summary_prompt(digest)).await
    }

    async fn ask(&self, digest: &BoardDigest, question: &str) -> AssistantResult<String> {
        self.complete(&question_prompt(digest, question)).await
    }
}
