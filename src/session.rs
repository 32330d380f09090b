//! Auth Session
//!
//! The signed-in session is an explicit value handed to every page.
//! It is restored once at startup and replaced on sign-in/sign-out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::AuthClient;
use crate::models::User;
use crate::storage;

const STORAGE_KEY: &str = "team-board.session";

/// Refresh this long before the token actually expires
const EXPIRY_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or("")
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= self.expires_at
    }

    pub fn load() -> Option<Self> {
        storage::read_json(STORAGE_KEY)
    }

    pub fn save(&self) {
        if let Err(e) = storage::write_json(STORAGE_KEY, self) {
            log::warn!("Session not persisted: {}", e);
        }
    }

    pub fn clear() {
        storage::remove(STORAGE_KEY);
    }
}

/// What the app knows about the current user
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// Startup restore still running
    #[default]
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }
}

/// Restore the persisted session, refreshing it when expired.
pub async fn restore_session(auth: &AuthClient) -> AuthState {
    let Some(stored) = Session::load() else {
        return AuthState::SignedOut;
    };
    if !stored.is_expired_at(Utc::now()) {
        log::info!("Restored session for {}", stored.email());
        return AuthState::SignedIn(stored);
    }

    log::info!("Stored session expired, refreshing");
    match auth.refresh(&stored.refresh_token).await {
        Ok(session) => {
            session.save();
            AuthState::SignedIn(session)
        }
        Err(e) => {
            log::warn!("Session refresh failed: {}", e);
            Session::clear();
            AuthState::SignedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring(at: DateTime<Utc>) -> Session {
        Session {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: at,
            user: User { id: "u1".to_string(), email: Some("dev@example.com".to_string()) },
        }
    }

    #[test]
    fn test_expiry_with_leeway() {
        let now = Utc::now();
        assert!(!session_expiring(now + Duration::minutes(10)).is_expired_at(now));
        assert!(session_expiring(now + Duration::seconds(30)).is_expired_at(now));
        assert!(session_expiring(now - Duration::minutes(1)).is_expired_at(now));
    }

    #[test]
    fn test_auth_state_accessors() {
        let session = session_expiring(Utc::now());
        let state = AuthState::SignedIn(session.clone());
        assert_eq!(state.session().map(|s| s.user_id()), Some("u1"));
        assert_eq!(session.email(), "dev@example.com");
        assert!(AuthState::default().is_loading());
        assert!(AuthState::SignedOut.session().is_none());
    }
}
