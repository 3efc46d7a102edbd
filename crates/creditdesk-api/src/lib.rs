//! Raw HTTP access to the customer directory service.
//!
//! This crate is pure transport: it speaks the directory's JSON wire
//! format and maps HTTP failures into [`Error`], nothing more. Domain
//! types, retry policy, and state live in `creditdesk-core`, which
//! wraps [`DirectoryClient`] behind its service trait.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DirectoryClient;
pub use error::Error;
pub use models::CustomerRecord;
pub use transport::{TlsMode, TransportConfig};
