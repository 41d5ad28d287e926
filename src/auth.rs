use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    storage::{CacheStore, SESSION_CACHE_KEY},
};

/// The signed-in user's session as issued by the backend at sign-in.
///
/// Validity is decided by the expiry metadata, never by the mere presence of
/// a cached record. The token itself is opaque to this crate; signature
/// verification is the backend's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Ambient-session seam. The controller and services never read storage or
/// tokens directly; they ask the provider.
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when signed out or expired.
    fn current_session(&self) -> Option<AuthSession>;
}

/// Errors with `Unauthenticated` when there is no active session.
pub fn require_session(provider: &dyn SessionProvider) -> AppResult<AuthSession> {
    provider.current_session().ok_or(AppError::Unauthenticated)
}

/// Errors with `Unauthenticated` when signed out, `Forbidden` when the
/// session's role is not `admin`.
pub fn require_admin(provider: &dyn SessionProvider) -> AppResult<AuthSession> {
    let session = require_session(provider)?;
    if !session.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(session)
}

/// Reads the session from the local cache entry written at sign-in and
/// filters out expired ones. An unreadable entry reads as signed-out rather
/// than an error.
pub struct CachedSessionProvider {
    cache: Arc<dyn CacheStore>,
}

impl CachedSessionProvider {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

impl SessionProvider for CachedSessionProvider {
    fn current_session(&self) -> Option<AuthSession> {
        let raw = self.cache.get(SESSION_CACHE_KEY)?;
        let session: AuthSession = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "cached session is unreadable, treating as signed out");
                return None;
            }
        };
        if session.is_active() {
            Some(session)
        } else {
            tracing::debug!(email = %session.email, "cached session expired");
            None
        }
    }
}
