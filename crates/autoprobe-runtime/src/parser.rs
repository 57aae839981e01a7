//! Model response grammar.
//!
//! Responses are labeled sections (`Observation:`, `Thought:`, ...). A
//! section runs until the next recognized label.

use std::collections::HashMap;

use autoprobe_protocols::{ActionDecision, ReflectionVerdict, SwipeDirection, SwipeDistance};

/// A parsed exploration response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDecision {
    pub action: ActionDecision,
    pub observation: String,
    pub thought: String,
    /// Model's running summary, used as memory for the next round.
    pub summary: String,
}

/// A parsed reflection response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReflection {
    pub verdict: ReflectionVerdict,
    pub thought: String,
}

/// Turns raw model text into structured decisions and verdicts.
pub trait ResponseParser: Send + Sync {
    fn parse_decision(&self, raw: &str) -> ParsedDecision;

    fn parse_reflection(&self, raw: &str) -> ParsedReflection;
}

const DECISION_LABELS: [&str; 4] = ["observation", "thought", "action", "summary"];
const REFLECTION_LABELS: [&str; 3] = ["decision", "thought", "documentation"];

/// Parser for the labeled-section response format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledResponseParser;

impl ResponseParser for LabeledResponseParser {
    fn parse_decision(&self, raw: &str) -> ParsedDecision {
        let sections = split_sections(raw, &DECISION_LABELS);
        let get = |key: &str| sections.get(key).cloned().unwrap_or_default();

        let action_text = get("action");
        let action = parse_action(&action_text);
        let summary = match get("summary") {
            s if s.is_empty() => action_text,
            s => s,
        };

        ParsedDecision {
            action,
            observation: get("observation"),
            thought: get("thought"),
            summary,
        }
    }

    fn parse_reflection(&self, raw: &str) -> ParsedReflection {
        let sections = split_sections(raw, &REFLECTION_LABELS);
        let get = |key: &str| sections.get(key).cloned().unwrap_or_default();

        let thought = get("thought");
        let doc = Some(get("documentation")).filter(|d| !d.is_empty());
        let decision = get("decision");
        let word: String = decision
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_matches(|c: char| !c.is_ascii_alphabetic())
            .to_ascii_uppercase();

        let verdict = match word.as_str() {
            "INEFFECTIVE" => ReflectionVerdict::Ineffective,
            "BACK" => ReflectionVerdict::Back(doc),
            "CONTINUE" => ReflectionVerdict::Continue(doc),
            "SUCCESS" => ReflectionVerdict::Success(doc),
            "ERROR" => ReflectionVerdict::Error(if thought.is_empty() {
                "model reported an error".to_string()
            } else {
                thought.clone()
            }),
            "" => ReflectionVerdict::Error("missing decision".to_string()),
            other => ReflectionVerdict::Error(format!("undefined decision: {}", other)),
        };

        ParsedReflection { verdict, thought }
    }
}

/// Split labeled text into sections keyed by lowercase label.
fn split_sections(raw: &str, labels: &[&'static str]) -> HashMap<&'static str, String> {
    let mut sections: HashMap<&'static str, Vec<&str>> = HashMap::new();
    let mut current: Option<&'static str> = None;

    for line in raw.lines() {
        if let Some((label, rest)) = match_label(line, labels) {
            current = Some(label);
            sections.entry(label).or_default().push(rest);
        } else if let Some(label) = current {
            sections.entry(label).or_default().push(line);
        }
    }

    sections
        .into_iter()
        .map(|(k, lines)| (k, lines.join("\n").trim().to_string()))
        .collect()
}

fn match_label<'a>(line: &'a str, labels: &[&'static str]) -> Option<(&'static str, &'a str)> {
    // Tolerate markdown decoration such as "**Action:**" or "- Thought:".
    let stripped = line.trim_start().trim_start_matches(['*', '#', '-', ' ']);
    let colon = stripped.find(':')?;
    let head = stripped[..colon].trim().trim_matches('*').to_ascii_lowercase();
    let label = labels.iter().find(|l| **l == head)?;
    let rest = stripped[colon + 1..].trim_start_matches('*').trim();
    Some((label, rest))
}

/// Parse the action line: `FINISH` or `name(args)`.
fn parse_action(text: &str) -> ActionDecision {
    let undefined = || ActionDecision::Undefined {
        raw: text.to_string(),
    };

    let line = text
        .lines()
        .map(|l| l.trim().trim_matches('`').trim())
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    if line.contains("FINISH") {
        return ActionDecision::Finish;
    }

    let (Some(open), Some(close)) = (line.find('('), line.rfind(')')) else {
        return undefined();
    };
    if close < open {
        return undefined();
    }
    let name = line[..open].trim();
    let args: Vec<&str> = line[open + 1..close].split(',').map(unquote).collect();

    let index = |i: usize| args.get(i).and_then(|a| a.parse::<usize>().ok());

    let parsed = match (name, args.len()) {
        ("tap", 1) => index(0).map(|index| ActionDecision::Tap { index }),
        ("long_press", 1) => index(0).map(|index| ActionDecision::LongPress { index }),
        ("swipe", 3) => match (
            index(0),
            SwipeDirection::parse(args[1]),
            SwipeDistance::parse(args[2]),
        ) {
            (Some(index), Some(direction), Some(distance)) => Some(ActionDecision::Swipe {
                index,
                direction,
                distance,
            }),
            _ => None,
        },
        // Text may itself contain commas.
        ("text", _) => Some(ActionDecision::Text {
            input: unquote(&line[open + 1..close]).to_string(),
        }),
        _ => None,
    };

    parsed.unwrap_or_else(undefined)
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '"' || c == '\'')
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
