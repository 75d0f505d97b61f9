//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// JMAP operation failed.
    #[error("JMAP error: {0}")]
    Jmap(#[from] email_linter_jmap::Error),

    /// The inbox or spam mailbox could not be identified.
    #[error("Mailbox resolution failed: {0}")]
    MailboxResolution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage error.
    #[error("Credential error: {0}")]
    Credential(#[from] crate::credentials::CredentialError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
