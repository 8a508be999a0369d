//! Ingestion error types

use thiserror::Error;

/// Shown when the service gives no usable `detail`.
pub const GENERIC_FAILURE: &str = "Failed to process statement. Please try again.";

#[derive(Error, Debug)]
pub enum IngestError {
    /// The service answered with a non-success status
    #[error("service rejected statement ({status}): {}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Rejected { status: u16, detail: Option<String> },

    /// The request never completed
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not a statement payload
    #[error("could not read statement payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Aggregation pattern failed to compile
    #[error("aggregation pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Reading the document from disk
    #[error("could not read document: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Text for the upload screen: the service's own message, verbatim, or the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            IngestError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_verbatim() {
        let e = IngestError::Rejected {
            status: 500,
            detail: Some("Wrong password or corrupted PDF file.".to_string()),
        };
        assert_eq!(e.user_message(), "Wrong password or corrupted PDF file.");
    }

    #[test]
    fn test_user_message_fallback() {
        let e = IngestError::Rejected {
            status: 502,
            detail: None,
        };
        assert_eq!(e.user_message(), GENERIC_FAILURE);
        assert!(e.to_string().contains("502"));

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(IngestError::from(decode).user_message(), GENERIC_FAILURE);
    }
}
