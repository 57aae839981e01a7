//! Interactive element discovery.
//!
//! Each round the current screen is looked up in the design file and its
//! interactive descendants become the numbered elements the model sees.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use autoprobe_protocols::{BoundingBox, DesignFile, DesignNode, ExploreError, Rect, UIElement};

/// Derives the per-round element list from the design file.
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    design: Arc<DesignFile>,
}

impl ElementRegistry {
    pub fn new(design: Arc<DesignFile>) -> Self {
        Self { design }
    }

    /// Resolve the screen node for an id taken from the page URL.
    pub fn resolve(&self, node_id: &str) -> Result<&DesignNode, ExploreError> {
        self.design
            .find_node(node_id)
            .ok_or_else(|| ExploreError::NodeNotFound(node_id.to_string()))
    }

    /// Ordered interactive elements of `screen`, minus `uninteresting`.
    ///
    /// Sorted by top edge, then left edge; equal positions keep document order.
    pub fn elements(&self, screen: &DesignNode, uninteresting: &HashSet<String>) -> Vec<UIElement> {
        let Some(frame) = screen.absolute_bounding_box else {
            debug!("Screen {} has no bounding box, no elements", screen.id);
            return Vec::new();
        };

        let mut found = Vec::new();
        for child in &screen.children {
            collect(child, &frame, &mut found);
        }

        found.retain(|e| !uninteresting.contains(&e.uid));
        found.sort_by(|a, b| {
            a.bbox
                .top_left
                .y
                .total_cmp(&b.bbox.top_left.y)
                .then(a.bbox.top_left.x.total_cmp(&b.bbox.top_left.x))
        });

        debug!("Screen {} has {} interactive elements", screen.id, found.len());
        found
    }
}

fn collect(node: &DesignNode, frame: &Rect, out: &mut Vec<UIElement>) {
    // Hidden nodes hide their whole subtree.
    if !node.visible {
        return;
    }

    if node.is_interactive() {
        if let Some(bbox) = node.absolute_bounding_box.and_then(|r| relative_box(&r, frame)) {
            let mut element = UIElement::new(node.id.clone(), bbox).with_node_type(node.node_type.clone());
            if !node.name.is_empty() {
                element = element.with_label(node.name.clone());
            }
            out.push(element);
        }
    }

    for child in &node.children {
        collect(child, frame, out);
    }
}

/// Translate into the frame's coordinates and clamp to it.
fn relative_box(rect: &Rect, frame: &Rect) -> Option<BoundingBox> {
    let clamp_x = |v: f64| v.clamp(0.0, frame.width);
    let clamp_y = |v: f64| v.clamp(0.0, frame.height);

    let bbox = BoundingBox::from_coords(
        clamp_x(rect.x - frame.x),
        clamp_y(rect.y - frame.y),
        clamp_x(rect.right() - frame.x),
        clamp_y(rect.bottom() - frame.y),
    );

    (!bbox.is_empty()).then_some(bbox)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
