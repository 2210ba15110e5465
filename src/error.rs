//! Error types for the session layer and the storage backend

use thiserror::Error;

/// Failures reported by [`crate::session::SessionManager`] operations.
///
/// Callers turn these into user-facing notifications; none of them are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    /// Unknown email, wrong password and unverified account all map here.
    #[error("invalid credentials or email not verified")]
    InvalidCredentials,
    #[error("no email awaiting verification")]
    NoPendingVerification,
    #[error("account not found")]
    AccountNotFound,
}

/// Failures reported by a [`crate::platform::KeyValueStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded writing {key} ({needed} bytes)")]
    QuotaExceeded { key: String, needed: usize },
    #[error("storage backend error: {0}")]
    Backend(String),
}
