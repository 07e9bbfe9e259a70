//! Submission handling: one request/response cycle per user question,
//! with the loading state published for whoever renders it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::{ApiClient, AskResponse};
use crate::markup;
use crate::transcript::{ImageAttachment, ImageState, Role, Transcript, Turn};

/// Substring patterns that mark a question as an image-generation request.
/// The classification is logged for diagnostics only; the same endpoint is
/// called either way.
const IMAGE_REQUEST_PATTERNS: &[&str] = &[
    "draw a",
    "draw an",
    "generate an image",
    "make a picture",
];

pub const BACKEND_ERROR_PREFIX: &str = "Sorry, something went wrong: ";
pub const CONNECTION_ERROR_PREFIX: &str = "Sorry, could not reach the server: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input: nothing appended, no request issued.
    Ignored,
    /// The exchange settled; both turns are in the transcript.
    Settled { seq: u64 },
}

/// Drives submissions against the ask endpoint and owns the transcript.
///
/// Submissions serialize through `&mut self`, so turns always land in
/// submission order; `seq` correlates the user turn with its answer.
pub struct ChatSession {
    client: Arc<ApiClient>,
    transcript: Transcript,
    state_tx: watch::Sender<SessionState>,
    next_seq: u64,
}

impl ChatSession {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            client,
            transcript: Transcript::new(),
            state_tx,
            next_seq: 0,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Watch the Idle/Loading flag, e.g. for a loading indicator.
    pub fn state_watch(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Submit a question. The user turn is appended before the request is
    /// issued; exactly one assistant turn follows, whether the exchange
    /// succeeds, fails logically, or fails in transport.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let question = input.trim().to_string();
        if question.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let seq = self.begin_exchange(&question);

        let is_image_request = IMAGE_REQUEST_PATTERNS
            .iter()
            .any(|pattern| question.contains(pattern));
        debug!(seq, is_image_request, "submitting question");

        match self.client.ask(&question).await {
            Ok(response) => self.settle_ask(seq, response).await,
            Err(err) => {
                warn!(seq, error = %err, "ask request failed");
                self.transcript.push(Turn::new(
                    seq,
                    Role::Ai,
                    format!("{CONNECTION_ERROR_PREFIX}{err}"),
                ));
            }
        }

        self.end_exchange();
        SubmitOutcome::Settled { seq }
    }

    /// Submit a prompt to the direct image-generation endpoint.
    pub async fn submit_image_prompt(&mut self, input: &str) -> SubmitOutcome {
        let prompt = input.trim().to_string();
        if prompt.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let seq = self.begin_exchange(&prompt);

        match self.client.generate_image(&prompt).await {
            Ok(response) => {
                if let Some(error) = response.error {
                    info!(seq, "image generation returned an error");
                    self.transcript.push(Turn::new(
                        seq,
                        Role::Ai,
                        format!("{BACKEND_ERROR_PREFIX}{error}"),
                    ));
                } else if let Some(url) = response.image_url {
                    let mut turn = Turn::new(
                        seq,
                        Role::Ai,
                        format!("Here is what I drew for \"{prompt}\"."),
                    );
                    turn.image = Some(self.attach_image(seq, url).await);
                    self.transcript.push(turn);
                } else {
                    self.transcript
                        .push(Turn::new(seq, Role::Ai, markup::NO_ANSWER_FALLBACK));
                }
            }
            Err(err) => {
                warn!(seq, error = %err, "image generation request failed");
                self.transcript.push(Turn::new(
                    seq,
                    Role::Ai,
                    format!("{CONNECTION_ERROR_PREFIX}{err}"),
                ));
            }
        }

        self.end_exchange();
        SubmitOutcome::Settled { seq }
    }

    fn begin_exchange(&mut self, content: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        // Optimistic: the user turn is visible before any network call.
        self.transcript.push(Turn::new(seq, Role::User, content));
        // send_replace stores the state even with no subscriber watching.
        self.state_tx.send_replace(SessionState::Loading);
        seq
    }

    fn end_exchange(&mut self) {
        self.state_tx.send_replace(SessionState::Idle);
    }

    async fn settle_ask(&mut self, seq: u64, response: AskResponse) {
        if let Some(error) = response.error {
            info!(seq, "backend returned a logical error");
            self.transcript.push(Turn::new(
                seq,
                Role::Ai,
                format!("{BACKEND_ERROR_PREFIX}{error}"),
            ));
            return;
        }

        let answer = response
            .answer
            .filter(|answer| !answer.trim().is_empty())
            .unwrap_or_else(|| markup::NO_ANSWER_FALLBACK.to_string());
        let mut turn = Turn::new(seq, Role::Ai, answer);

        if let Some(url) = response.image_url {
            turn.image = Some(self.attach_image(seq, url).await);
        }

        if !response.documents.is_empty() {
            // Reserved extension point: recorded on the turn, not rendered.
            debug!(seq, count = response.documents.len(), "reference documents attached");
            turn.documents = response.documents;
        }

        self.transcript.push(turn);
    }

    async fn attach_image(&self, seq: u64, url: String) -> ImageAttachment {
        let state = match self.client.probe_image(&url).await {
            Ok(()) => ImageState::Loaded,
            Err(err) => {
                warn!(seq, url = %url, error = %err, "image fetch failed");
                ImageState::Failed
            }
        };
        ImageAttachment { url, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_request_patterns_match_by_substring() {
        assert!(IMAGE_REQUEST_PATTERNS
            .iter()
            .any(|p| "please draw a bird for me".contains(p)));
        assert!(!IMAGE_REQUEST_PATTERNS
            .iter()
            .any(|p| "when does the library open".contains(p)));
    }
}
