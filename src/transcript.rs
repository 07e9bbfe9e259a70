use chrono::{DateTime, Utc};

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Ai => "assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub url: String,
    pub state: ImageState,
}

/// One rendered chat entry. Turns are created on submit (user) or on
/// response (assistant) and are never mutated once appended.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Submission correlation id; the user turn and the assistant turn of
    /// the same exchange share it.
    pub seq: u64,
    pub role: Role,
    pub content: String,
    pub image: Option<ImageAttachment>,
    pub documents: Vec<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(seq: u64, role: Role, content: impl Into<String>) -> Self {
        Self {
            seq,
            role,
            content: content.into(),
            image: None,
            documents: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only list of turns for one session. No persistence across runs.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Both turns of one exchange, in append order.
    pub fn exchange(&self, seq: u64) -> Vec<&Turn> {
        self.turns.iter().filter(|turn| turn.seq == seq).collect()
    }
}
