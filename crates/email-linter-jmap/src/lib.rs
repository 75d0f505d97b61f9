//! # email-linter-jmap
//!
//! Minimal JMAP (RFC 8620/8621) client for the email linter.
//!
//! ## Features
//!
//! - **Session discovery**: bearer-token session fetch and account selection
//! - **Batched queries**: `Foo/query` + `Foo/get` in one round-trip, with the
//!   store-wide match count for truncation checks
//! - **Typed wire model**: filters, comparators and responses as serde types,
//!   validated once at the boundary
//! - **Pluggable transport**: anything implementing [`Transport`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use email_linter_jmap::{Filter, Property, QueryOptions, connect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = connect("https://api.fastmail.com/jmap/session", "token").await?;
//!
//!     let envelope = client
//!         .query_emails(
//!             &Filter::in_mailbox("inbox-id"),
//!             &[Property::To],
//!             &QueryOptions::emails(),
//!         )
//!         .await?;
//!
//!     if envelope.is_truncated() {
//!         println!("{} of {} threads", envelope.retrieved(), envelope.total);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod client;
mod error;
pub mod model;
pub mod query;
pub mod request;
pub mod response;
pub mod session;

pub use client::{HttpTransport, JmapClient, Transport, connect};
pub use error::{Error, Result};
pub use model::{Email, EmailAddress, Mailbox};
pub use query::{DataType, QueryEnvelope, QueryOptions};
pub use request::{Filter, Property};
pub use session::{DEFAULT_SESSION_URL, Session};
