//! Interactive UI elements.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// An interactive element on the current screen.
///
/// Built fresh every round. Only `uid` carries meaning across rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIElement {
    /// Design-node identifier, stable for the same underlying node.
    pub uid: String,

    /// Box in screen-region coordinates.
    pub bbox: BoundingBox,

    /// Node type, e.g. "INSTANCE" or "FRAME".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// Human-readable node name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl UIElement {
    pub fn new(uid: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            uid: uid.into(),
            bbox,
            node_type: None,
            label: None,
        }
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
