/// Assistant collaborator
///
/// The assistant turns a [`BoardDigest`] into free text: a summary of the
/// project, or an answer to a question about it. It never influences
/// ordering; its output is forwarded to the caller unmodified.
///
/// # Implementations
///
/// - [`gemini::GeminiAssistant`]: Google generative-language REST API
/// - [`scripted::ScriptedAssistant`]: deterministic replies for tests and demos
///
/// # Example
///
/// ```
/// use taskboard_shared::assistant::{summarize_board, digest::BoardDigest, scripted::ScriptedAssistant};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let assistant = ScriptedAssistant::new();
/// let digest = BoardDigest {
///     project_name: "Launch".to_string(),
///     project_description: None,
///     columns: vec![],
/// };
///
/// let summary = summarize_board(&assistant, &digest).await?;
/// assert_eq!(summary, "No tasks found in this project.");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use thiserror::Error;

pub mod digest;
pub mod gemini;
pub mod scripted;

pub use digest::BoardDigest;

/// Reply for a summary request on a project without tasks
pub const EMPTY_PROJECT_SUMMARY: &str = "No tasks found in this project.";

/// Assistant errors
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Completion service could not be reached or timed out
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    /// Completion service answered with an error status
    #[error("Assistant request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response did not contain any text
    #[error("Assistant returned an empty response")]
    EmptyResponse,

    /// Response body could not be decoded
    #[error("Invalid assistant response: {0}")]
    InvalidResponse(String),
}

/// Assistant result type alias
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Text completion over board context
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Summarizes the digest
    async fn summarize(&self, digest: &BoardDigest) -> AssistantResult<String>;

    /// Answers `question` using the digest as context
    async fn ask(&self, digest: &BoardDigest, question: &str) -> AssistantResult<String>;
}

/// Summarizes a board, short-circuiting when it has no tasks
pub async fn summarize_board(
    assistant: &dyn Assistant,
    digest: &BoardDigest,
) -> AssistantResult<String> {
    if digest.task_count() == 0 {
        return Ok(EMPTY_PROJECT_SUMMARY.to_string());
    }

    tracing::debug!(
        assistant = assistant.name(),
        tasks = digest.task_count(),
        "Requesting board summary"
    );
    assistant.summarize(digest).await
}
