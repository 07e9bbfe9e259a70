use serde::{Deserialize, Serialize};

/// A canned query surfaced as a one-keystroke shortcut. Selecting one goes
/// through the same submission path as typed input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuickAction {
    pub label: String,
    pub query: String,
}

impl QuickAction {
    pub fn new(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
        }
    }
}

pub fn defaults() -> Vec<QuickAction> {
    vec![
        QuickAction::new(
            "Fitness test items",
            "Which items are part of the university fitness test?",
        ),
        QuickAction::new(
            "Quality evaluation",
            "How does the student comprehensive quality evaluation work?",
        ),
        QuickAction::new("Draw a bird", "draw a bird"),
    ]
}
