//! Design-file node trees.
//!
//! The design service returns a document tree. Each prototype screen is a
//! frame somewhere in that tree, and its interactive descendants carry
//! prototype reactions.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DesignError;

/// Absolute bounding box of a design node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

fn default_visible() -> bool {
    true
}

/// A node in the design document.
///
/// Fields not modelled here are preserved in `extra` so that snapshots
/// written back to disk keep the full node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub node_type: String,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rect>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Value>,

    #[serde(
        rename = "transitionNodeID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transition_node_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesignNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            node_type: node_type.into(),
            visible: true,
            absolute_bounding_box: None,
            reactions: Vec::new(),
            transition_node_id: None,
            children: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(Rect {
            x,
            y,
            width,
            height,
        });
        self
    }

    pub fn with_transition(mut self, target: impl Into<String>) -> Self {
        self.transition_node_id = Some(target.into());
        self
    }

    pub fn with_reaction(mut self, reaction: Value) -> Self {
        self.reactions.push(reaction);
        self
    }

    pub fn with_child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    /// Whether the node carries prototype interactions.
    pub fn is_interactive(&self) -> bool {
        !self.reactions.is_empty()
            || self
                .transition_node_id
                .as_deref()
                .is_some_and(|t| !t.is_empty())
    }
}

/// A whole design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    #[serde(default)]
    pub name: String,
    pub document: DesignNode,
}

impl DesignFile {
    /// Find a node anywhere in the document. Accepts URL-style ids.
    pub fn find_node(&self, id: &str) -> Option<&DesignNode> {
        find_node_by_id(&normalize_node_id(id), &self.document)
    }
}

/// Depth-first, pre-order search for a node with the given id.
pub fn find_node_by_id<'a>(id: &str, root: &'a DesignNode) -> Option<&'a DesignNode> {
    if root.id == id {
        return Some(root);
    }
    root.children
        .iter()
        .find_map(|child| find_node_by_id(id, child))
}

/// Convert a node id as it appears in prototype URLs ("12-34", "12%3A34")
/// to the document form ("12:34").
pub fn normalize_node_id(raw: &str) -> String {
    let decoded = raw.trim().replace("%3A", ":").replace("%3a", ":");
    if decoded.contains(':') {
        decoded
    } else {
        decoded.replace('-', ":")
    }
}

/// Source of design files.
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Fetch a design file by key.
    ///
    /// When `cache_dir` is given, `<cache_dir>/<file_key>.json` is read if it
    /// exists and written after a successful fetch otherwise.
    async fn fetch_file(
        &self,
        file_key: &str,
        cache_dir: Option<&Path>,
    ) -> Result<DesignFile, DesignError>;
}

#[cfg(test)]
#[path = "design_tests.rs"]
mod tests;
