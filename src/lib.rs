pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod markup;
pub mod quick_actions;
pub mod runtime_paths;
pub mod scheduler;
pub mod session;
pub mod transcript;
pub mod ui;

pub use error::AsklineError;

pub type Result<T> = std::result::Result<T, AsklineError>;
