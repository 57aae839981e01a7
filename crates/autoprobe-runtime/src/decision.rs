//! Action decision stage.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use autoprobe_protocols::{ActionDecision, ExploreError, VisionModel};

use crate::parser::{ParsedDecision, ResponseParser};
use crate::prompts::{persona_clause, render, EXPLORE_TEMPLATE};

/// Inputs for one decision.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput<'a> {
    pub task_description: &'a str,
    pub persona_description: Option<&'a str>,
    pub last_action: &'a str,
    /// Labeled screenshot of the current screen.
    pub image: &'a Path,
}

/// A model exchange and its parsed result.
#[derive(Debug, Clone)]
pub struct DecisionOutput {
    pub prompt: String,
    pub response: String,
    pub parsed: ParsedDecision,
}

impl DecisionOutput {
    /// The decided action, checked against the current element count.
    ///
    /// Undefined actions and indices outside `1..=element_count` are
    /// protocol violations.
    pub fn checked_action(&self, element_count: usize) -> Result<&ActionDecision, ExploreError> {
        let action = &self.parsed.action;
        if let ActionDecision::Undefined { raw } = action {
            return Err(ExploreError::ProtocolViolation(format!(
                "undefined action: {:?}",
                raw
            )));
        }
        if let Some(index) = action.element_index() {
            if index == 0 || index > element_count {
                return Err(ExploreError::ProtocolViolation(format!(
                    "element index {} out of range ({} elements)",
                    index, element_count
                )));
            }
        }
        Ok(action)
    }
}

/// Asks the model what to do next.
pub struct ActionDecisionStage {
    model: Arc<dyn VisionModel>,
    parser: Arc<dyn ResponseParser>,
}

impl ActionDecisionStage {
    pub fn new(model: Arc<dyn VisionModel>, parser: Arc<dyn ResponseParser>) -> Self {
        Self { model, parser }
    }

    pub fn prompt(input: &DecisionInput<'_>) -> String {
        render(
            EXPLORE_TEMPLATE,
            &[
                ("persona_description", &persona_clause(input.persona_description)),
                ("task_description", input.task_description),
                ("last_act", input.last_action),
            ],
        )
    }

    /// Query the model. A failed call is a [`ExploreError::Model`].
    pub async fn decide(&self, input: DecisionInput<'_>) -> Result<DecisionOutput, ExploreError> {
        let prompt = Self::prompt(&input);
        debug!("Requesting decision from {}", self.model.id());

        let response = self
            .model
            .get_response(&prompt, &[input.image.to_path_buf()])
            .await?;
        let parsed = self.parser.parse_decision(&response);
        info!("Decision: {}", parsed.action);

        Ok(DecisionOutput {
            prompt,
            response,
            parsed,
        })
    }
}
