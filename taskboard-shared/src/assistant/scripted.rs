/// Deterministic assistant for tests and demos
///
/// Replies are derived from the digest alone, so callers can assert on them.
/// With `should_fail` set every call fails with
/// [`AssistantError::Unavailable`].

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Assistant, AssistantError, AssistantResult, BoardDigest};

#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    should_fail: bool,
    calls: AtomicUsize,
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assistant whose every call fails
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completion calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> AssistantResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(AssistantError::Unavailable("scripted failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn summarize(&self, digest: &BoardDigest) -> AssistantResult<String> {
        self.record()?;
        let columns: Vec<String> = digest
            .columns
            .iter()
            .filter(|column| !column.tasks.is_empty())
            .map(|column| format!("{} {}", column.tasks.len(), column.name))
            .collect();

        Ok(format!(
            "{}: {} tasks ({})",
            digest.project_name,
            digest.task_count(),
            columns.join(", ")
        ))
    }

    async fn ask(&self, digest: &BoardDigest, question: &str) -> AssistantResult<String> {
        self.record()?;
        let titles: Vec<&str> = digest
            .columns
            .iter()
            .flat_map(|column| column.tasks.iter().map(|task| task.title.as_str()))
            .collect();

        Ok(format!("Q: {} | context: {}", question, titles.join("; ")))
    }
}
