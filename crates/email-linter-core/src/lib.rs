//! # email-linter-core
//!
//! Finds masked (disposable) email addresses that have leaked to spammers.
//!
//! This crate provides:
//! - **Address classification** - recognises addresses of protection services
//!   such as `duck.com`, undoing forwarding rewrites like `a_at_b@duck.com`
//! - **Sender aggregation** - a sorted, deduplicated reverse index from each
//!   disposable address to the senders that reached it outside spam
//! - **Pipeline** - mailbox resolution, the two batched JMAP queries, and the
//!   truncation bookkeeping between them
//! - **Credentials** - API token lookup and keyring storage

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod aggregate;
pub mod classify;
pub mod config;
pub mod credentials;
mod error;
pub mod mailbox;
pub mod pipeline;

pub use aggregate::{DisposableSet, SenderIndex, aggregate};
pub use classify::{Classification, classify};
pub use config::{DEFAULT_DOMAINS, DomainSet, LinterConfig};
pub use credentials::{CredentialError, CredentialResult, TokenSource};
pub use error::{Error, Result};
pub use mailbox::MailboxPair;
pub use pipeline::{Outcome, Report, Truncation, run};
