//! Identifier and timestamp utilities for MDX documents.
//!
//! Every MDX manifest carries a document identifier and a pair of UTC timestamps, and
//! every annotation record carries its own identifier. This crate owns both formats so
//! that the rest of the workspace never formats or parses them by hand.
//!
//! ## Canonical identifier form
//! - Lowercase, hyphenated UUID version 4 (36 characters)
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Non-canonical values (uppercase, unhyphenated, wrong version) are rejected by
//! [`DocumentId::parse`].
//!
//! ## Timestamp form
//! - `YYYY-MM-DDTHH:MM:SSZ`, always UTC, whole seconds
//! - Example: `2026-01-15T09:30:00Z`
//!
//! ## Providers
//!
//! Builders never call the system clock or random source directly. They take an
//! [`IdentityProvider`]; production code passes [`SystemIdentity`] and tests pass
//! [`FixedIdentity`] so that generated manifests are reproducible.

mod provider;
mod service;

// Re-export public types
pub use provider::{FixedIdentity, IdentityProvider, SystemIdentity};
pub use service::{DocumentId, Timestamp, Uuid, TIMESTAMP_FORMAT};

/// Error type for identifier and timestamp operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
