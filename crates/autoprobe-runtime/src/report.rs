//! Markdown report narrating an exploration for the operator.

use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::parser::{ParsedDecision, ParsedReflection};
use crate::prompts::persona_clause;

/// Appends sections to the task's markdown report.
pub struct ReportWriter {
    file: Mutex<File>,
}

impl ReportWriter {
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    async fn append(&self, text: &str) -> std::io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(text.as_bytes()).await?;
        file.write_all(b"\n\n").await?;
        file.flush().await
    }

    pub async fn header(
        &self,
        app: &str,
        task_name: &str,
        task_description: &str,
        persona: Option<&str>,
    ) -> std::io::Result<()> {
        self.append(&format!("# User Testing Report for {}", app)).await?;
        self.append(task_name).await?;
        self.append("## Task Description").await?;
        self.append(task_description).await?;

        let persona = persona_clause(persona);
        if !persona.is_empty() {
            self.append("## Persona Description").await?;
            self.append(&persona).await?;
        }
        Ok(())
    }

    pub async fn round(&self, round: u32) -> std::io::Result<()> {
        self.append(&format!("## Round {}", round)).await
    }

    pub async fn image(&self, alt: &str, file_name: &str) -> std::io::Result<()> {
        self.append(&format!("![{}]({})", alt, file_name)).await
    }

    pub async fn decision(&self, parsed: &ParsedDecision) -> std::io::Result<()> {
        self.append(&format!(
            "Observation: {}\n\nThought: {}\n\nAction: {}\n\nSummary: {}",
            parsed.observation, parsed.thought, parsed.action, parsed.summary
        ))
        .await
    }

    pub async fn reflection(&self, parsed: &ParsedReflection) -> std::io::Result<()> {
        let mut text = format!(
            "Decision: {}\n\nThought: {}",
            parsed.verdict.name(),
            parsed.thought
        );
        if let Some(doc) = parsed.verdict.documentation() {
            text.push_str(&format!("\n\nDocumentation: {}", doc));
        }
        self.append(&text).await
    }

    pub async fn note(&self, text: &str) -> std::io::Result<()> {
        self.append(text).await
    }
}
