/// Board context handed to the assistant
///
/// A digest is a read-only snapshot: the project, then its columns in
/// display order, each with its tasks in task order.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDigest {
    pub project_name: String,
    pub project_description: Option<String>,
    pub columns: Vec<DigestColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestColumn {
    pub name: String,
    pub tasks: Vec<DigestTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestTask {
    pub title: String,
    pub description: Option<String>,
}

impl BoardDigest {
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    /// Plain-text rendering passed to the completion service
    ///
    /// Columns without tasks are omitted.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Project: {}", self.project_name);
        let _ = writeln!(
            out,
            "Description: {}",
            self.project_description.as_deref().unwrap_or("No description")
        );

        for column in self.columns.iter().filter(|column| !column.tasks.is_empty()) {
            let _ = writeln!(out, "\n{}:", column.name);
            for task in &column.tasks {
                match &task.description {
                    Some(description) => {
                        let _ = writeln!(out, "- {}: {}", task.title, description);
                    }
                    None => {
                        let _ = writeln!(out, "- {}", task.title);
                    }
                }
            }
        }

        out
    }
}
