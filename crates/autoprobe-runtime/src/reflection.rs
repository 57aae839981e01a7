//! Reflection stage and documentation write policy.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use autoprobe_protocols::{ActionKind, DocumentationRecord, ExploreError, VisionModel};

use crate::docstore::DocumentationStore;
use crate::parser::{ParsedReflection, ResponseParser};
use crate::prompts::{persona_clause, render, REFLECT_TEMPLATE};

/// Inputs for one reflection.
#[derive(Debug, Clone, Copy)]
pub struct ReflectionInput<'a> {
    /// 1-based tag of the acted element on the labeled screenshot.
    pub element_index: usize,
    pub kind: ActionKind,
    pub task_description: &'a str,
    pub persona_description: Option<&'a str>,
    pub last_action: &'a str,
    pub before_image: &'a Path,
    pub after_image: &'a Path,
}

/// A reflection exchange and its parsed verdict.
#[derive(Debug, Clone)]
pub struct ReflectionOutput {
    pub prompt: String,
    pub response: String,
    pub parsed: ParsedReflection,
}

/// Asks the model to judge the last action.
pub struct ReflectionStage {
    model: Arc<dyn VisionModel>,
    parser: Arc<dyn ResponseParser>,
}

impl ReflectionStage {
    pub fn new(model: Arc<dyn VisionModel>, parser: Arc<dyn ResponseParser>) -> Self {
        Self { model, parser }
    }

    pub fn prompt(input: &ReflectionInput<'_>) -> String {
        render(
            REFLECT_TEMPLATE,
            &[
                ("action", input.kind.gerund()),
                ("ui_element", &input.element_index.to_string()),
                ("task_desc", input.task_description),
                ("persona_description", &persona_clause(input.persona_description)),
                ("last_act", input.last_action),
            ],
        )
    }

    /// Query the model with the before and after screenshots.
    ///
    /// A failed call is a [`ExploreError::Reflection`].
    pub async fn reflect(&self, input: ReflectionInput<'_>) -> Result<ReflectionOutput, ExploreError> {
        let prompt = Self::prompt(&input);
        debug!("Requesting reflection from {}", self.model.id());

        let images = [input.before_image.to_path_buf(), input.after_image.to_path_buf()];
        let response = self
            .model
            .get_response(&prompt, &images)
            .await
            .map_err(|e| ExploreError::Reflection(e.to_string()))?;
        let parsed = self.parser.parse_reflection(&response);
        info!("Reflection: {}", parsed.verdict.name());

        Ok(ReflectionOutput {
            prompt,
            response,
            parsed,
        })
    }
}

/// Write `text` into the (`uid`, `kind`) slot unless it is already filled.
///
/// Returns true when the record was written.
pub async fn record_documentation(
    store: &dyn DocumentationStore,
    uid: &str,
    kind: ActionKind,
    text: &str,
) -> Result<bool, ExploreError> {
    let mut record = store
        .load(uid)
        .await
        .map_err(|e| ExploreError::Documentation(e.to_string()))?
        .unwrap_or_else(|| DocumentationRecord::new(uid));

    if !record.fill(kind, text) {
        info!("Documentation for {} ({}) already exists", uid, kind);
        return Ok(false);
    }

    store
        .save(&record)
        .await
        .map_err(|e| ExploreError::Documentation(e.to_string()))?;
    info!("Documented {} ({}): {}", uid, kind, text);
    Ok(true)
}
