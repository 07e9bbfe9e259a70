use thiserror::Error;

#[derive(Debug, Error)]
pub enum AsklineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub use crate::Result;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_error_class() {
        let err = AsklineError::Http("request failed: 500".to_string());
        assert!(format!("{err}").contains("http error"));
        let err = AsklineError::Config("missing base url".to_string());
        assert!(format!("{err}").contains("configuration error"));
    }
}
