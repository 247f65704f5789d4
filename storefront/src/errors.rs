//! Error types and client-safe error text.
//!
//! Two concerns live here:
//!
//! - [`OrderStoreError`]: failures at the order-storage boundary. The core
//!   functions themselves are pure and never produce I/O errors; only the
//!   fetch boundary can fail.
//! - [`safe_client_message`]: mapping raw error text to messages safe to
//!   show a customer, so storage and auth internals never leak through the
//!   UI or an HTTP response body.

use thiserror::Error;

/// Errors that can occur when reading from the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// The storage backend could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A stored row could not be decoded into the typed aggregate.
    #[error("Failed to decode stored order: {0}")]
    DecodeFailed(String),

    /// The read took too long.
    #[error("Order store operation timed out")]
    Timeout,

    /// An unexpected internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for order-store operations.
pub type OrderStoreResult<T> = Result<T, OrderStoreError>;

/// Map raw error text to a message safe to show a customer.
///
/// Known, expected failure classes get a specific friendly message; a short
/// list of auth phrases is safe to pass through verbatim; anything else
/// collapses to `fallback` so internals are never disclosed.
pub fn safe_client_message(raw: &str, fallback: &str) -> String {
    if raw.trim().is_empty() {
        return fallback.to_owned();
    }

    let lower = raw.to_lowercase();

    if lower.contains("jwt") || lower.contains("token") {
        return "Authentication failed. Please sign in again.".to_owned();
    }
    if lower.contains("invalid login") || lower.contains("invalid email or password") {
        return "Invalid email or password.".to_owned();
    }
    if lower.contains("email not confirmed") {
        return "Please confirm your email address.".to_owned();
    }
    if lower.contains("rate limit") || lower.contains("too many requests") {
        return "Too many attempts. Please wait a moment and try again.".to_owned();
    }
    if lower.contains("redirect") && (lower.contains("not allowed") || lower.contains("invalid")) {
        return "Sign-in link is blocked by auth settings. Add this site URL and \
                /auth/callback to the allowed redirect URLs, then try again."
            .to_owned();
    }
    if lower.contains("permission denied") || lower.contains("policy") || lower.contains("rls") {
        return "Access denied. You may not have permission for this action.".to_owned();
    }
    if lower.contains("not found") || lower.contains("does not exist") {
        return "The requested resource was not found.".to_owned();
    }
    if lower.contains("network") || lower.contains("fetch") {
        return "Network error. Please check your connection and try again.".to_owned();
    }
    if lower.contains("invalid") && lower.contains("format") {
        return "Invalid input format. Please check your data.".to_owned();
    }

    // Auth phrases that are safe to surface verbatim.
    const SAFE_PATTERNS: [&str; 5] = [
        "email already registered",
        "signup is disabled",
        "password should be",
        "email rate limit exceeded",
        "user already registered",
    ];
    if SAFE_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return raw.to_owned();
    }

    fallback.to_owned()
}
