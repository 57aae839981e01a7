use super::*;

#[test]
fn test_element_index() {
    assert_eq!(ActionDecision::Tap { index: 2 }.element_index(), Some(2));
    assert_eq!(
        ActionDecision::Swipe {
            index: 5,
            direction: SwipeDirection::Up,
            distance: SwipeDistance::Short,
        }
        .element_index(),
        Some(5)
    );
    assert_eq!(ActionDecision::Finish.element_index(), None);
    assert_eq!(
        ActionDecision::Text {
            input: "hello".into()
        }
        .element_index(),
        None
    );
}

#[test]
fn test_swipe_kind_follows_direction() {
    let vertical = ActionDecision::Swipe {
        index: 1,
        direction: SwipeDirection::Down,
        distance: SwipeDistance::Medium,
    };
    let horizontal = ActionDecision::Swipe {
        index: 1,
        direction: SwipeDirection::Left,
        distance: SwipeDistance::Medium,
    };
    assert_eq!(vertical.kind(), Some(ActionKind::VSwipe));
    assert_eq!(horizontal.kind(), Some(ActionKind::HSwipe));
}

#[test]
fn test_finish_and_undefined_have_no_kind() {
    assert_eq!(ActionDecision::Finish.kind(), None);
    assert_eq!(
        ActionDecision::Undefined {
            raw: "wave()".into()
        }
        .kind(),
        None
    );
}

#[test]
fn test_display() {
    let swipe = ActionDecision::Swipe {
        index: 3,
        direction: SwipeDirection::Right,
        distance: SwipeDistance::Long,
    };
    assert_eq!(swipe.to_string(), "swipe(3, \"right\", \"long\")");
    assert_eq!(ActionDecision::LongPress { index: 7 }.to_string(), "long_press(7)");
}

#[test]
fn test_action_kind_keys() {
    let keys: Vec<&str> = [
        ActionKind::Tap,
        ActionKind::Text,
        ActionKind::VSwipe,
        ActionKind::HSwipe,
        ActionKind::LongPress,
    ]
    .iter()
    .map(|k| k.as_str())
    .collect();
    assert_eq!(keys, vec!["tap", "text", "v_swipe", "h_swipe", "long_press"]);
    assert_eq!(ActionKind::LongPress.gerund(), "long pressing");
}

#[test]
fn test_decision_serialization() {
    let json = serde_json::to_value(ActionDecision::Tap { index: 4 }).unwrap();
    assert_eq!(json["type"], "tap");
    assert_eq!(json["index"], 4);
}
