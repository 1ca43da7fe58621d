//! Logged-in session state machine.
//!
//! A session is either logged out or logged in with a decoded claim view
//! and a pair of timers: a warning one minute before expiry and an
//! automatic logout at expiry. Both timers hang off one
//! `CancellationToken`. Replacing or tearing down a schedule cancels it
//! while holding the state lock, and a timer that has already woken
//! re-checks cancellation under that same lock before acting, so a stale
//! timer can never log out a newer session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use pb_core::domain::token::ClaimSet;
use pb_core::services::token::decode_claim_set;

use crate::storage::{SessionStore, AUTH_TOKEN_KEY, IS_LOGGED_IN_KEY};

/// Lead time of the expiry warning, in seconds.
const WARNING_LEAD_SECS: i64 = 60;

/// Session lifecycle notifications for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The token expires within one minute.
    Warning,
    /// The session ended because the token expired.
    Expired,
    /// Logged-in state flipped (login or logout).
    Changed,
}

#[derive(Default)]
struct SessionInner {
    token: Option<String>,
    claims: ClaimSet,
    schedule: Option<CancellationToken>,
}

/// Client-side session state with durable storage and expiry timers.
pub struct AuthSession<S: SessionStore> {
    store: S,
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<SessionEvent>,
}

impl<S: SessionStore + 'static> AuthSession<S> {
    pub fn new(store: S) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            inner: Mutex::new(SessionInner::default()),
            events,
        }
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Resume a persisted session, if one exists.
    ///
    /// The schedule restarts from the stored token's expiry; a token that
    /// is already past its expiry is logged out immediately by the
    /// schedule it installs.
    pub async fn load_from_storage(
        self: &Arc<Self>,
    ) -> Result<(), crate::storage::StorageError> {
        let logged_in = self.store.get(IS_LOGGED_IN_KEY).await?;
        let token = self.store.get(AUTH_TOKEN_KEY).await?;

        match (logged_in.as_deref(), token) {
            (Some("true"), Some(token)) => {
                debug!("resuming persisted session");
                self.install(token).await;
                let _ = self.events.send(SessionEvent::Changed);
            }
            _ => debug!("no persisted session to resume"),
        }
        Ok(())
    }

    /// Enter the logged-in state with a fresh token.
    pub async fn set_logged_in(
        self: &Arc<Self>,
        token: impl Into<String>,
    ) -> Result<(), crate::storage::StorageError> {
        let token = token.into();
        self.store.set(IS_LOGGED_IN_KEY, "true").await?;
        self.store.set(AUTH_TOKEN_KEY, &token).await?;

        self.install(token).await;
        let _ = self.events.send(SessionEvent::Changed);
        Ok(())
    }

    /// Leave the logged-in state.
    ///
    /// Idempotent: a second call finds nothing to tear down and emits
    /// nothing. A storage failure is logged and swallowed so logout can
    /// never be observed to fail.
    pub async fn logout(&self) {
        let was_logged_in = {
            let mut inner = self.inner.lock().await;
            if let Some(schedule) = inner.schedule.take() {
                schedule.cancel();
            }
            inner.claims = ClaimSet::default();
            inner.token.take().is_some()
        };

        for key in [IS_LOGGED_IN_KEY, AUTH_TOKEN_KEY] {
            if let Err(e) = self.store.remove(key).await {
                warn!(key, error = %e, "failed to clear session storage");
            }
        }

        if was_logged_in {
            let _ = self.events.send(SessionEvent::Changed);
        }
    }

    /// Whether a session is currently active.
    pub async fn is_logged_in(&self) -> bool {
        self.inner.lock().await.token.is_some()
    }

    /// The raw bearer token, when logged in.
    pub async fn token(&self) -> Option<String> {
        self.inner.lock().await.token.clone()
    }

    /// Username from the decoded claims, when extractable.
    pub async fn username(&self) -> Option<String> {
        self.inner.lock().await.claims.username.clone()
    }

    /// Case-insensitive role check against the decoded claims.
    pub async fn has_role(&self, role: &str) -> bool {
        self.inner.lock().await.claims.has_role(role)
    }

    /// Whether any of the given roles matches, case-insensitively.
    pub async fn has_any_role(&self, roles: &[&str]) -> bool {
        self.inner.lock().await.claims.has_any_role(roles)
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    /// Replace the in-memory state and (re)start the expiry schedule.
    async fn install(self: &Arc<Self>, token: String) {
        let claims = decode_claim_set(&token);
        let schedule = CancellationToken::new();

        {
            let mut inner = self.inner.lock().await;
            if let Some(previous) = inner.schedule.take() {
                previous.cancel();
            }
            inner.token = Some(token);
            inner.claims = claims.clone();
            inner.schedule = Some(schedule.clone());
        }

        let Some(expires_at) = claims.expires_at else {
            // Without an expiry claim the session stays open until an
            // explicit logout.
            debug!("token carries no expiry; no schedule installed");
            return;
        };

        let now = Utc::now();
        let warning_lead = chrono::Duration::seconds(WARNING_LEAD_SECS);
        if let Ok(warning_delay) = (expires_at - warning_lead - now).to_std() {
            self.spawn_timer(schedule.clone(), warning_delay, TimerKind::Warning);
        }

        // An already-expired token fires the logout path right away.
        let expiry_delay = (expires_at - now).to_std().unwrap_or(Duration::ZERO);
        self.spawn_timer(schedule, expiry_delay, TimerKind::Expiry);
    }

    fn spawn_timer(self: &Arc<Self>, schedule: CancellationToken, delay: Duration, kind: TimerKind) {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = schedule.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            match kind {
                TimerKind::Warning => session.fire_warning(&schedule).await,
                TimerKind::Expiry => session.expire(&schedule).await,
            }
        });
    }

    /// Warning timer body. The cancellation re-check happens under the
    /// state lock: a schedule replaced by a newer login was cancelled
    /// under that lock, so a stale timer can never warn for it.
    async fn fire_warning(&self, schedule: &CancellationToken) {
        let _inner = self.inner.lock().await;
        if schedule.is_cancelled() {
            return;
        }
        let _ = self.events.send(SessionEvent::Warning);
    }

    /// Expiry timer body. Teardown is atomic with the cancellation
    /// re-check: both happen under the state lock, so a timer whose
    /// schedule was replaced while it waited for the lock finds it
    /// cancelled and backs off instead of tearing down the new session.
    async fn expire(&self, schedule: &CancellationToken) {
        let was_logged_in = {
            let mut inner = self.inner.lock().await;
            if schedule.is_cancelled() {
                return;
            }
            if let Some(current) = inner.schedule.take() {
                current.cancel();
            }
            inner.claims = ClaimSet::default();
            inner.token.take().is_some()
        };

        for key in [IS_LOGGED_IN_KEY, AUTH_TOKEN_KEY] {
            if let Err(e) = self.store.remove(key).await {
                warn!(key, error = %e, "failed to clear session storage");
            }
        }

        if was_logged_in {
            let _ = self.events.send(SessionEvent::Changed);
        }
        let _ = self.events.send(SessionEvent::Expired);
    }
}

#[derive(Debug, Clone, Copy)]
enum TimerKind {
    Warning,
    Expiry,
}
