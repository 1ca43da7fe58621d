//! Authenticated HTTP transport.
//!
//! Wraps `reqwest::Client` so every request carries the session's bearer
//! token when one is present. A `401` response that also carries the
//! `Token-Expired: true` header means the server rejected the token for
//! lifetime reasons; the session is force-logged-out so the UI can
//! return to login. Any other `401` passes through untouched.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::session::{AuthSession, SessionEvent};
use crate::storage::{SessionStore, StorageError};

/// Response header the server sets when a token failed for expiry.
pub const TOKEN_EXPIRED_HEADER: &str = "Token-Expired";

/// Errors raised by the authenticated transport.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// HTTP client bound to a session.
pub struct AuthClient<S: SessionStore + 'static> {
    http: reqwest::Client,
    base_url: String,
    session: Arc<AuthSession<S>>,
}

impl<S: SessionStore + 'static> AuthClient<S> {
    pub fn new(base_url: impl Into<String>, session: Arc<AuthSession<S>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// GET with the session's bearer token attached.
    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        let request = self.http.get(self.url(path));
        self.execute(request).await
    }

    /// POST a JSON body with the session's bearer token attached.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(request).await
    }

    /// POST without a body.
    pub async fn post(&self, path: &str) -> Result<Response, ClientError> {
        let request = self.http.post(self.url(path));
        self.execute(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token (when logged in), send, and react to a
    /// server-side expiry signal.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        if signals_expiry(response.status(), response.headers()) {
            info!("server reported token expiry; logging out");
            self.session.logout().await;
            self.session.publish(SessionEvent::Expired);
        }

        Ok(response)
    }
}

/// Whether a response is the server's token-expiry rejection.
fn signals_expiry(status: StatusCode, headers: &HeaderMap) -> bool {
    status == StatusCode::UNAUTHORIZED
        && headers
            .get(TOKEN_EXPIRED_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
}
