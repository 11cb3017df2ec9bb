/// Failures surfaced by the quote engine.
///
/// None of these are fatal: every variant is recovered by the caller and
/// turned into a status message, leaving the store in its previous state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("Please fill in both quote text and category ({0} is empty)")]
    Validation(&'static str),

    #[error("\"{0}\" is reserved and cannot be used as a category")]
    ReservedCategory(String),

    #[error("No such category: {0}")]
    UnknownCategory(String),

    #[error("Failed to parse persisted {key}: {reason}")]
    PersistenceParse { key: String, reason: String },

    #[error("Failed to import quotes: {0}")]
    ImportParse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote source error ({status}): {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl QuoteError {
    /// Whether the failure came from talking to the remote source
    pub fn is_remote(&self) -> bool {
        matches!(self, QuoteError::Network(_) | QuoteError::RemoteStatus { .. })
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::Network(e.to_string())
    }
}

pub type Result<T, E = QuoteError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_classification() {
        assert!(QuoteError::Network("refused".into()).is_remote());
        assert!(QuoteError::RemoteStatus {
            status: 500,
            body: String::new()
        }
        .is_remote());
        assert!(!QuoteError::Validation("text").is_remote());
        assert!(!QuoteError::ImportParse("bad".into()).is_remote());
        assert!(!QuoteError::UnknownCategory("Poetry".into()).is_remote());
    }

    #[test]
    fn test_display_messages() {
        let err = QuoteError::RemoteStatus {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "Remote source error (503): unavailable");
        assert_eq!(
            QuoteError::Validation("category").to_string(),
            "Please fill in both quote text and category (category is empty)"
        );
        assert_eq!(
            QuoteError::ReservedCategory("All".into()).to_string(),
            "\"All\" is reserved and cannot be used as a category"
        );
    }
}
