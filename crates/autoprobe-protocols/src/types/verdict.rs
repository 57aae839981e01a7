//! Reflection verdicts.

use serde::{Deserialize, Serialize};

/// The model's judgement of the action it just took.
///
/// Documentation text is carried by the verdicts that may record it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "documentation", rename_all = "UPPERCASE")]
pub enum ReflectionVerdict {
    /// Nothing changed on screen.
    Ineffective,
    /// The action left the task path; navigate back.
    Back(Option<String>),
    /// Meaningful change, but not toward the task.
    Continue(Option<String>),
    /// Progress toward the task.
    Success(Option<String>),
    /// The model reported an error or the verdict was unrecognized.
    Error(String),
}

impl ReflectionVerdict {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ineffective => "INEFFECTIVE",
            Self::Back(_) => "BACK",
            Self::Continue(_) => "CONTINUE",
            Self::Success(_) => "SUCCESS",
            Self::Error(_) => "ERROR",
        }
    }

    /// Non-empty documentation carried by the verdict.
    pub fn documentation(&self) -> Option<&str> {
        match self {
            Self::Back(doc) | Self::Continue(doc) | Self::Success(doc) => {
                doc.as_deref().filter(|d| !d.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Whether the acted element is excluded from later rounds.
    pub fn marks_uninteresting(&self) -> bool {
        matches!(self, Self::Ineffective | Self::Back(_) | Self::Continue(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documentation_filters_blank() {
        assert_eq!(
            ReflectionVerdict::Success(Some("opens settings".into())).documentation(),
            Some("opens settings")
        );
        assert_eq!(ReflectionVerdict::Back(Some("  ".into())).documentation(), None);
        assert_eq!(ReflectionVerdict::Continue(None).documentation(), None);
        assert_eq!(ReflectionVerdict::Ineffective.documentation(), None);
    }

    #[test]
    fn test_marks_uninteresting() {
        assert!(ReflectionVerdict::Ineffective.marks_uninteresting());
        assert!(ReflectionVerdict::Back(None).marks_uninteresting());
        assert!(ReflectionVerdict::Continue(None).marks_uninteresting());
        assert!(!ReflectionVerdict::Success(None).marks_uninteresting());
        assert!(!ReflectionVerdict::Error("x".into()).marks_uninteresting());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(ReflectionVerdict::Success(Some("doc".into()))).unwrap();
        assert_eq!(json["decision"], "SUCCESS");
        assert_eq!(json["documentation"], "doc");
    }
}
