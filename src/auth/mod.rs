/*!
 * # Authentication Module
 *
 * Login, logout and password reset against the backend's `/auth` endpoints,
 * plus the explicit [`AuthState`] the navigation guard is evaluated against.
 *
 * A stored token is the only proof of authentication: there is no refresh
 * and no expiry check. A stale token surfaces as an `Unauthorized` error on
 * the next backend call.
 */

pub mod session;

use crate::client::{endpoints, ApiClient};
use crate::errors::{ConsoleError, FieldErrors};
use crate::navigation::Route;
use crate::notifications::Notification;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use validator::Validate;

pub use session::{FileStorage, KeyValueStorage, MemoryStorage, Session, SessionStore, UserInfo};

/// Authentication state handed to the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }
}

impl From<Option<Session>> for AuthState {
    fn from(session: Option<Session>) -> Self {
        session.map_or(AuthState::Anonymous, AuthState::Authenticated)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginCredentials {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Result of a successful login: the new session and where to go next.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    pub notification: Notification,
    pub redirect: Route,
    pub redirect_after: Duration,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Service for session lifecycle against the backend.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
    sessions: SessionStore,
    redirect_delay: Duration,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, sessions: SessionStore, redirect_delay: Duration) -> Self {
        Self {
            client,
            sessions,
            redirect_delay,
        }
    }

    /// Loads the persisted session and arms the API client with its token.
    pub fn restore(&self) -> Result<AuthState, ConsoleError> {
        let session = self.sessions.load()?;
        self.client
            .set_token(session.as_ref().map(|s| s.token.clone()));
        Ok(session.into())
    }

    pub fn state(&self) -> Result<AuthState, ConsoleError> {
        Ok(self.sessions.load()?.into())
    }

    /// Authenticates with the backend and persists the resulting session.
    ///
    /// Any stale session is cleared first, so a failed login leaves the
    /// operator logged out.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ConsoleError> {
        let credentials = LoginCredentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;

        self.sessions.clear()?;
        self.client.set_token(None);

        let response: LoginResponse = self
            .client
            .post(endpoints::LOGIN, &credentials)
            .await
            .map_err(|e| {
                warn!(error = %e, "login rejected");
                e
            })?;

        let token = response
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConsoleError::Unauthorized(Some("Login failed".to_string())))?;

        let session = Session {
            token,
            user: Some(UserInfo {
                email: response.email.unwrap_or(credentials.email),
                logged_in_at: Utc::now(),
            }),
        };
        self.sessions.save(&session)?;
        self.client.set_token(Some(session.token.clone()));
        info!(email = ?session.email(), "operator logged in");

        Ok(LoginOutcome {
            session,
            notification: Notification::success("Login successful! Redirecting to dashboard..."),
            redirect: Route::Dashboard,
            redirect_after: self.redirect_delay,
        })
    }

    /// Drops the token and user info; the next stop is the login screen.
    pub fn logout(&self) -> Result<Route, ConsoleError> {
        self.sessions.clear()?;
        self.client.set_token(None);
        info!("operator logged out");
        Ok(Route::Login)
    }

    /// Asks the backend to send a one-time password to `email`.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ConsoleError> {
        let request = PasswordResetRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;
        let _: serde_json::Value = self
            .client
            .post(endpoints::FORGOT_PASSWORD, &request)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, reset), fields(email = %reset.email))]
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<(), ConsoleError> {
        reset.validate()?;
        let _: serde_json::Value = self
            .client
            .post(endpoints::RESET_PASSWORD, reset)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    RequestOtp,
    EnterOtp,
    Done,
}

/// Two-step "forgot password" flow: request an OTP, then reset with it.
#[derive(Debug, Clone)]
pub struct ForgotPasswordFlow {
    step: ResetStep,
    email: Option<String>,
}

impl Default for ForgotPasswordFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ForgotPasswordFlow {
    pub fn new() -> Self {
        Self {
            step: ResetStep::RequestOtp,
            email: None,
        }
    }

    /// Continues a flow whose OTP was requested earlier.
    pub fn resume(email: impl Into<String>) -> Self {
        Self {
            step: ResetStep::EnterOtp,
            email: Some(email.into()),
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub async fn send_otp(&mut self, auth: &AuthService, email: &str) -> Result<(), ConsoleError> {
        auth.request_password_reset(email).await?;
        self.email = Some(email.trim().to_string());
        self.step = ResetStep::EnterOtp;
        Ok(())
    }

    pub async fn reset(
        &mut self,
        auth: &AuthService,
        otp: &str,
        new_password: &str,
    ) -> Result<(), ConsoleError> {
        let email = match (&self.step, &self.email) {
            (ResetStep::EnterOtp, Some(email)) => email.clone(),
            _ => {
                return Err(ConsoleError::Validation(FieldErrors::single(
                    "otp",
                    "Request an OTP before resetting the password",
                )))
            }
        };
        let reset = PasswordReset {
            email,
            otp: otp.trim().to_string(),
            new_password: new_password.to_string(),
        };
        auth.reset_password(&reset).await?;
        self.step = ResetStep::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let client =
            Arc::new(ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap());
        AuthService::new(client, SessionStore::in_memory(), Duration::from_millis(0))
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_before_any_request() {
        let err = service().login("not-an-email", "pw").await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("email"), Some("Enter a valid email address"));
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let err = service().login("admin@example.com", "").await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("password"));
    }

    #[tokio::test]
    async fn reset_requires_otp_step() {
        let mut flow = ForgotPasswordFlow::new();
        let err = flow.reset(&service(), "1234", "secret").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(flow.step(), ResetStep::RequestOtp);
    }

    #[test]
    fn logout_clears_state() {
        let auth = service();
        auth.sessions
            .save(&Session {
                token: "t".into(),
                user: None,
            })
            .unwrap();
        assert!(auth.restore().unwrap().is_authenticated());
        assert_eq!(auth.logout().unwrap(), Route::Login);
        assert_eq!(auth.state().unwrap(), AuthState::Anonymous);
        assert_eq!(auth.client.token(), None);
    }
}
