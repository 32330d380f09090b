//! Auth Client
//!
//! Password, refresh-token and sign-up flows against `/auth/v1`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::rest::check;
use crate::config::BackendConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::session::Session;

#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    config: BackendConfig,
}

/// Result of a sign-up request
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The account exists but the email address must be confirmed first
    ConfirmationRequired,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

impl AuthClient {
    pub(crate) fn new(http: reqwest::Client, config: BackendConfig) -> Self {
        Self { http, config }
    }

    fn ensure_configured(&self) -> ApiResult<()> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(ApiError::Config("set the backend URL and anon key in Settings".to_string()))
        }
    }

    async fn token(&self, grant_type: &str, body: &impl Serialize) -> ApiResult<Session> {
        self.ensure_configured()?;
        let response = self
            .http
            .post(self.config.auth_url(&format!("token?grant_type={}", grant_type)))
            .header("apikey", &self.config.anon_key)
            .json(body)
            .send()
            .await?;
        let token: TokenResponse = check(response).await?.json().await?;
        Ok(token.into_session(Utc::now()))
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let session = self.token("password", &PasswordGrant { email, password }).await?;
        log::info!("Signed in as {}", session.email());
        Ok(session)
    }

    /// Sign in to the shared demo account, which is pre-populated with
    /// sample projects and tasks
    pub async fn sign_in_demo(&self) -> ApiResult<Session> {
        self.sign_in_with_password(&self.config.demo_email, &self.config.demo_password)
            .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<Session> {
        self.token("refresh_token", &RefreshGrant { refresh_token }).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> ApiResult<SignUpOutcome> {
        self.ensure_configured()?;
        let response = self
            .http
            .post(self.config.auth_url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;
        let body: serde_json::Value = check(response).await?.json().await?;
        parse_sign_up(body, Utc::now())
    }

    /// Revoke the session server-side. Local state is cleared by the caller
    /// regardless of the outcome.
    pub async fn sign_out(&self, session: &Session) -> ApiResult<()> {
        self.ensure_configured()?;
        let response = self
            .http
            .post(self.config.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Auto-confirmed projects answer sign-up with a full token response;
/// otherwise only the pending user comes back.
fn parse_sign_up(body: serde_json::Value, now: DateTime<Utc>) -> ApiResult<SignUpOutcome> {
    if body.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(body)?;
        Ok(SignUpOutcome::SignedIn(token.into_session(now)))
    } else {
        Ok(SignUpOutcome::ConfirmationRequired)
    }
}
