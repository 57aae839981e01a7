//! Per-element documentation records.

use serde::{Deserialize, Serialize};

use super::ActionKind;

/// Documentation for one UI element, one slot per action kind.
///
/// An empty slot means undocumented. A filled slot is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationRecord {
    pub uid: String,
    #[serde(default)]
    pub tap: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub v_swipe: String,
    #[serde(default)]
    pub h_swipe: String,
    #[serde(default)]
    pub long_press: String,
}

impl DocumentationRecord {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, kind: ActionKind) -> &str {
        match kind {
            ActionKind::Tap => &self.tap,
            ActionKind::Text => &self.text,
            ActionKind::VSwipe => &self.v_swipe,
            ActionKind::HSwipe => &self.h_swipe,
            ActionKind::LongPress => &self.long_press,
        }
    }

    fn slot_mut(&mut self, kind: ActionKind) -> &mut String {
        match kind {
            ActionKind::Tap => &mut self.tap,
            ActionKind::Text => &mut self.text,
            ActionKind::VSwipe => &mut self.v_swipe,
            ActionKind::HSwipe => &mut self.h_swipe,
            ActionKind::LongPress => &mut self.long_press,
        }
    }

    /// Fill an empty slot. Returns false, leaving the record untouched, if
    /// the slot already holds text.
    pub fn fill(&mut self, kind: ActionKind, text: impl Into<String>) -> bool {
        let slot = self.slot_mut(kind);
        if !slot.is_empty() {
            return false;
        }
        *slot = text.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = DocumentationRecord::new("12:34");
        assert_eq!(record.uid, "12:34");
        assert!(record.tap.is_empty());
        assert!(record.long_press.is_empty());
    }

    #[test]
    fn test_fill_once() {
        let mut record = DocumentationRecord::new("1:2");
        assert!(record.fill(ActionKind::Tap, "opens settings panel"));
        assert!(!record.fill(ActionKind::Tap, "something else"));
        assert_eq!(record.get(ActionKind::Tap), "opens settings panel");
        assert!(record.fill(ActionKind::HSwipe, "switches tab"));
        assert_eq!(record.h_swipe, "switches tab");
        assert!(record.v_swipe.is_empty());
    }

    #[test]
    fn test_deserialize_missing_slots() {
        let record: DocumentationRecord =
            serde_json::from_str(r#"{"uid": "1:2", "tap": "x"}"#).unwrap();
        assert_eq!(record.tap, "x");
        assert!(record.long_press.is_empty());
    }
}
