use std::{sync::Arc, time::Duration};

use axum::{extract::{Request, State}, http::header::AUTHORIZATION, middleware::Next, response::Response};
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::task::{SeaOrmTaskRepository, TaskService};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub api_token: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub auth: ServerAuthConfig,
    pub tasks: Arc<TaskService<SeaOrmTaskRepository>>,
    /// Requests slower than this are logged at WARN.
    pub slow_request: Duration,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let repo = Arc::new(SeaOrmTaskRepository::new(db));
        Self {
            auth: ServerAuthConfig { api_token: cfg.auth.api_token.clone() },
            tasks: Arc::new(TaskService::new(repo)),
            slow_request: Duration::from_millis(cfg.logging.slow_request_ms),
        }
    }
}

/// Compare fixed-length SHA-256 digests with `subtle` so neither content nor length leaks through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let hash_a = Sha256::digest(a);
    let hash_b = Sha256::digest(b);
    hash_a.ct_eq(&hash_b).into()
}

/// Extract the credential from an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Route middleware for mutating endpoints: `Authorization: Bearer <token>` must carry the shared secret.
/// Runs before body extraction, so unauthorized requests never reach validation or storage.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path();
    let method = req.method();

    let Some(header) = req.headers().get(AUTHORIZATION) else {
        tracing::warn!(%method, %path, "missing Authorization header");
        return Err(ApiError::Unauthorized("missing bearer token".into()));
    };
    let Some(token) = header.to_str().ok().and_then(bearer_token) else {
        tracing::warn!(%method, %path, "invalid Authorization format (expect Bearer)");
        return Err(ApiError::Unauthorized("invalid authorization header (expect Bearer)".into()));
    };
    if !constant_time_eq(token.as_bytes(), state.auth.api_token.as_bytes()) {
        tracing::warn!(%method, %path, "bearer token mismatch");
        return Err(ApiError::Unauthorized("invalid token".into()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }

    #[test]
    fn compares_tokens() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret2"));
        assert!(!constant_time_eq(b"x", b"secret"));
        assert!(!constant_time_eq(b"", b"secret"));
    }
}
