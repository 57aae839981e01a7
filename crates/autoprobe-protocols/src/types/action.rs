//! Model action decisions.

use serde::{Deserialize, Serialize};

use super::{SwipeDirection, SwipeDistance};

/// The action chosen by the model for one round.
///
/// Element indices are 1-based, as shown on the labeled screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDecision {
    /// The task is complete.
    Finish,
    Tap { index: usize },
    LongPress { index: usize },
    Swipe {
        index: usize,
        direction: SwipeDirection,
        distance: SwipeDistance,
    },
    /// Text input. Not executed on prototype canvases.
    Text { input: String },
    /// Anything the grammar does not recognize.
    Undefined { raw: String },
}

impl ActionDecision {
    /// Index of the targeted element, if the action targets one.
    pub fn element_index(&self) -> Option<usize> {
        match self {
            Self::Tap { index } | Self::LongPress { index } | Self::Swipe { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// Documentation slot that a reflection on this action fills.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::Tap { .. } => Some(ActionKind::Tap),
            Self::LongPress { .. } => Some(ActionKind::LongPress),
            Self::Swipe { direction, .. } if direction.is_vertical() => Some(ActionKind::VSwipe),
            Self::Swipe { .. } => Some(ActionKind::HSwipe),
            Self::Text { .. } => Some(ActionKind::Text),
            Self::Finish | Self::Undefined { .. } => None,
        }
    }

    /// Short name used in logs and the report.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Finish => "FINISH",
            Self::Tap { .. } => "tap",
            Self::LongPress { .. } => "long_press",
            Self::Swipe { .. } => "swipe",
            Self::Text { .. } => "text",
            Self::Undefined { .. } => "undefined",
        }
    }
}

impl std::fmt::Display for ActionDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finish => write!(f, "FINISH"),
            Self::Tap { index } => write!(f, "tap({})", index),
            Self::LongPress { index } => write!(f, "long_press({})", index),
            Self::Swipe {
                index,
                direction,
                distance,
            } => write!(f, "swipe({}, \"{}\", \"{}\")", index, direction, distance),
            Self::Text { input } => write!(f, "text({:?})", input),
            Self::Undefined { raw } => write!(f, "undefined({})", raw),
        }
    }
}

/// Documentation slot keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Tap,
    Text,
    VSwipe,
    HSwipe,
    LongPress,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::Text => "text",
            Self::VSwipe => "v_swipe",
            Self::HSwipe => "h_swipe",
            Self::LongPress => "long_press",
        }
    }

    /// Gerund used in the reflection prompt.
    pub fn gerund(&self) -> &'static str {
        match self {
            Self::Tap => "tapping",
            Self::Text => "typing",
            Self::VSwipe | Self::HSwipe => "swiping",
            Self::LongPress => "long pressing",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
