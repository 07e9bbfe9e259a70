//! Line-oriented terminal front end: reads questions from stdin, prints
//! rendered turns, and follows the health prober's status line.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::debug;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{AsklineError, Result};
use crate::health::BackendStatus;
use crate::markup;
use crate::quick_actions::QuickAction;
use crate::session::{ChatSession, SubmitOutcome};
use crate::transcript::{ImageAttachment, ImageState, Role, Turn};

const PROMPT: &str = "> ";

pub struct ChatUi {
    session: ChatSession,
    quick_actions: Vec<QuickAction>,
    status_rx: watch::Receiver<BackendStatus>,
    printed_turns: usize,
}

impl ChatUi {
    pub fn new(
        client: Arc<ApiClient>,
        config: &Config,
        status_rx: watch::Receiver<BackendStatus>,
    ) -> Self {
        Self {
            session: ChatSession::new(client),
            quick_actions: config.quick_actions(),
            status_rx,
            printed_turns: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("askline - ask a question, or /help for commands.");
        self.print_quick_actions();
        print_prompt();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        // Selected on its own handle so the input branch can borrow `self`.
        let mut status_rx = self.status_rx.clone();
        let mut status_open = true;
        loop {
            tokio::select! {
                changed = status_rx.changed(), if status_open => {
                    if changed.is_err() {
                        // Prober gone; keep serving input without a status line.
                        status_open = false;
                        continue;
                    }
                    let status = *status_rx.borrow_and_update();
                    println!();
                    println!("[status] {}", status.message());
                    print_prompt();
                }
                line = lines.next_line() => {
                    let line = line.map_err(|e| AsklineError::Runtime(e.to_string()))?;
                    let Some(line) = line else {
                        // stdin closed
                        return Ok(());
                    };
                    if !self.handle_line(line.trim()).await? {
                        return Ok(());
                    }
                    print_prompt();
                }
            }
        }
    }

    async fn handle_line(&mut self, line: &str) -> Result<bool> {
        match line {
            "" => return Ok(true),
            "/quit" | "/exit" => return Ok(false),
            "/help" => {
                print_help();
                return Ok(true);
            }
            "/status" => {
                println!("[status] {}", self.status_rx.borrow().message());
                return Ok(true);
            }
            "/quick" => {
                self.print_quick_actions();
                return Ok(true);
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("/q ") {
            return Ok(self.submit_quick_action(rest).await);
        }
        if let Some(prompt) = line.strip_prefix("/image ") {
            println!("(thinking...)");
            let outcome = self.session.submit_image_prompt(prompt).await;
            debug!(?outcome, "image prompt settled");
            self.flush_new_turns();
            return Ok(true);
        }
        if line.starts_with('/') {
            println!("Unknown command: {line}. Try /help.");
            return Ok(true);
        }

        println!("(thinking...)");
        let outcome = self.session.submit(line).await;
        if outcome == SubmitOutcome::Ignored {
            return Ok(true);
        }
        self.flush_new_turns();
        Ok(true)
    }

    async fn submit_quick_action(&mut self, index: &str) -> bool {
        let Some(action) = index
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| self.quick_actions.get(n).cloned())
        else {
            println!("No such quick action. /quick lists them.");
            return true;
        };
        println!("(thinking...)");
        self.session.submit(&action.query).await;
        self.flush_new_turns();
        true
    }

    fn print_quick_actions(&self) {
        println!("Quick actions (/q <n> to send):");
        for (index, action) in self.quick_actions.iter().enumerate() {
            println!("  {}. {} - \"{}\"", index + 1, action.label, action.query);
        }
    }

    fn flush_new_turns(&mut self) {
        let turns: Vec<Turn> = self
            .session
            .transcript()
            .iter()
            .skip(self.printed_turns)
            .cloned()
            .collect();
        for turn in &turns {
            print_turn(turn);
        }
        self.printed_turns += turns.len();
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("{PROMPT}");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("Commands:");
    println!("  /quick          list quick actions");
    println!("  /q <n>          send quick action n");
    println!("  /image <text>   generate an image from a prompt");
    println!("  /status         show backend status");
    println!("  /quit           exit");
}

fn print_turn(turn: &Turn) {
    let label = match turn.role {
        Role::User => format!("\x1b[36m{}\x1b[0m", turn.role.label()),
        Role::Ai => format!("\x1b[32m{}\x1b[0m", turn.role.label()),
    };
    println!("{label}:");
    let blocks = markup::parse(&turn.content);
    for line in markup::render_ansi(&blocks).lines() {
        println!("  {line}");
    }
    if let Some(image) = &turn.image {
        println!("  {}", image_note(image));
    }
    println!();
}

/// One-line terminal stand-in for the image element: the URL when the
/// image resolved, a visible error note linking the raw URL when it
/// did not.
pub fn image_note(image: &ImageAttachment) -> String {
    match image.state {
        ImageState::Loaded | ImageState::Pending => format!("[image] {}", image.url),
        ImageState::Failed => format!(
            "[image] could not be loaded. Open {} directly to view it.",
            image.url
        ),
    }
}
