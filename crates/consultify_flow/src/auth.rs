// --- File: crates/consultify_flow/src/auth.rs ---
//! Authentication context for the booking flow.
//!
//! Token validation is someone else's job; here authentication is a black
//! box answering "does the caller hold a session token?". The context is
//! resolved once per request and passed into the orchestrator explicitly,
//! so the precondition is testable without ambient storage.

use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Evidence that the caller presented a session token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token: String,
}

impl AuthContext {
    /// Resolves the auth context from the `Authorization: Bearer` header.
    /// A missing or empty token means "not authenticated".
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self {
                token: token.to_string(),
            })
        }
    }
}
