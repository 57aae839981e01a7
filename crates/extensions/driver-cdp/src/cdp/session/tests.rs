use serde_json::json;

use super::core::PageSession;

#[test]
fn test_previous_history_entry() {
    let history = json!({
        "currentIndex": 2,
        "entries": [{"id": 10}, {"id": 11}, {"id": 12}]
    });
    assert_eq!(PageSession::previous_history_entry(&history), Some(11));
}

#[test]
fn test_previous_history_entry_at_start() {
    let history = json!({
        "currentIndex": 0,
        "entries": [{"id": 10}]
    });
    assert_eq!(PageSession::previous_history_entry(&history), None);
}

#[test]
fn test_previous_history_entry_malformed() {
    assert_eq!(PageSession::previous_history_entry(&json!({})), None);
    let history = json!({"currentIndex": 3, "entries": [{"id": 1}]});
    assert_eq!(PageSession::previous_history_entry(&history), None);
}
