//! Account flows: login, email signup, password reset/change, GitHub OAuth.

use std::sync::Arc;

use zonedash_api::{
    ChangePasswordRequest, LoginRequest, ResetPasswordRequest, Route, SignupOtpRequest, User,
    VerifySignupRequest,
};

use crate::context::ServiceContext;
use crate::error::{CoreError, CoreResult};

pub const FIELDS_REQUIRED: &str = "Please fill in all fields";
pub const WEAK_PASSWORD: &str = "Password does not meet security requirements";
pub const WEAK_NEW_PASSWORD: &str = "New password does not meet security requirements";
pub const NEW_PASSWORD_TOO_SHORT: &str = "New password must be at least 8 characters";

pub const RESET_CODE_SENT: &str = "Verification code sent to your email.";
pub const PASSWORD_RESET_DONE: &str = "Password reset successfully. Please login.";
pub const PASSWORD_OTP_SENT: &str = "OTP sent to your email";
pub const PASSWORD_UPDATED: &str = "Password updated successfully";

const OAUTH_FAILED: &str = "Authentication failed. Please try again.";

/// Password strength rules.
pub struct PasswordPolicy;

impl PasswordPolicy {
    pub const MIN_LENGTH: usize = 8;

    pub fn check(password: &str) -> PasswordChecks {
        PasswordChecks {
            min_length: password.chars().count() >= Self::MIN_LENGTH,
            has_upper: password.chars().any(|c| c.is_ascii_uppercase()),
            has_lower: password.chars().any(|c| c.is_ascii_lowercase()),
            has_number: password.chars().any(|c| c.is_ascii_digit()),
            has_special: password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }
}

/// Per-rule result, so a form can tick rules off as the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PasswordChecks {
    pub min_length: bool,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_number: bool,
    pub has_special: bool,
}

impl PasswordChecks {
    pub fn is_valid(&self) -> bool {
        self.min_length && self.has_upper && self.has_lower && self.has_number && self.has_special
    }
}

/// Everything the second signup step sends.
#[derive(Debug, Clone)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub otp: String,
}

/// Map an OAuth callback `error` code to the message shown on the login page.
pub fn oauth_error_message(code: &str) -> &'static str {
    match code {
        "no_account" => {
            "No account found. Please create an account first using email and password."
        }
        "not_verified" => {
            "Please verify your account with the OTP sent to your email before using GitHub signin."
        }
        "no_verified_email" => {
            "No verified email found on your GitHub account. Please verify your email on GitHub first."
        }
        "github_auth_failed" => "GitHub authentication failed. Please try again.",
        _ => OAUTH_FAILED,
    }
}

/// Auth service
///
/// Every flow that ends with a token stores it in the session and sends the
/// user to the dashboard.
pub struct AuthService {
    ctx: Arc<ServiceContext>,
}

impl AuthService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn login(&self, email: &str, password: &str) -> CoreResult<()> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::InvalidInput(FIELDS_REQUIRED.to_string()));
        }
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = self
            .ctx
            .auth_api
            .login(&req)
            .await
            .map_err(|e| failed(e, "Login failed"))?
            .token;
        log::info!("Logged in as {email}");
        self.sign_in(token).await
    }

    /// First signup step: check the password locally, then have a code emailed.
    pub async fn start_signup(&self, name: &str, email: &str, password: &str) -> CoreResult<()> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(CoreError::InvalidInput(FIELDS_REQUIRED.to_string()));
        }
        if !PasswordPolicy::check(password).is_valid() {
            return Err(CoreError::InvalidInput(WEAK_PASSWORD.to_string()));
        }
        let req = SignupOtpRequest {
            email: email.trim().to_string(),
            name: name.trim().to_string(),
        };
        self.ctx
            .auth_api
            .send_signup_otp(&req)
            .await
            .map_err(|e| failed(e, "Failed to send OTP"))?;
        Ok(())
    }

    /// Second signup step: trade the emailed code for a session.
    pub async fn complete_signup(&self, draft: &SignupDraft) -> CoreResult<()> {
        let req = VerifySignupRequest {
            email: draft.email.trim().to_string(),
            name: draft.name.trim().to_string(),
            password: draft.password.clone(),
            otp: draft.otp.trim().to_string(),
        };
        let token = self
            .ctx
            .auth_api
            .verify_signup_otp(&req)
            .await
            .map_err(|e| failed(e, "Verification failed"))?
            .token;
        log::info!("Signed up as {}", req.email);
        self.sign_in(token).await
    }

    pub async fn request_password_reset(&self, email: &str) -> CoreResult<&'static str> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CoreError::InvalidInput(FIELDS_REQUIRED.to_string()));
        }
        self.ctx
            .auth_api
            .forgot_password(email)
            .await
            .map_err(|e| failed(e, "Failed to send code"))?;
        Ok(RESET_CODE_SENT)
    }

    /// Set a new password with an emailed code, then go back to the login page.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> CoreResult<&'static str> {
        if !PasswordPolicy::check(new_password).is_valid() {
            return Err(CoreError::InvalidInput(WEAK_NEW_PASSWORD.to_string()));
        }
        let req = ResetPasswordRequest {
            email: email.trim().to_string(),
            otp: otp.trim().to_string(),
            new_password: new_password.to_string(),
        };
        self.ctx
            .auth_api
            .reset_password(&req)
            .await
            .map_err(|e| failed(e, "Failed to reset password"))?;
        self.ctx.navigator.navigate(Route::Login);
        Ok(PASSWORD_RESET_DONE)
    }

    /// First step of a password change from settings: email a code.
    pub async fn request_password_change(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> CoreResult<&'static str> {
        if old_password.is_empty() || new_password.is_empty() {
            return Err(CoreError::InvalidInput(FIELDS_REQUIRED.to_string()));
        }
        if new_password.chars().count() < PasswordPolicy::MIN_LENGTH {
            return Err(CoreError::InvalidInput(NEW_PASSWORD_TOO_SHORT.to_string()));
        }
        self.ctx
            .auth_api
            .send_password_otp()
            .await
            .map_err(|e| failed(e, "Failed to send OTP"))?;
        Ok(PASSWORD_OTP_SENT)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        otp: &str,
    ) -> CoreResult<&'static str> {
        let req = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
            otp: otp.trim().to_string(),
        };
        self.ctx
            .auth_api
            .change_password(&req)
            .await
            .map_err(|e| failed(e, "Failed to update password"))?;
        Ok(PASSWORD_UPDATED)
    }

    pub async fn current_user(&self) -> CoreResult<User> {
        self.ctx
            .auth_api
            .me()
            .await
            .map_err(|e| failed(e, "Failed to fetch user"))
    }

    /// Confirm the stored session still works; a failure signs the user out.
    pub async fn check_session(&self) -> CoreResult<User> {
        match self.current_user().await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.logout().await?;
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> CoreResult<()> {
        self.ctx
            .session
            .clear()
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        self.ctx.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Where to send the user to start GitHub sign-in.
    pub fn github_login_url(&self) -> String {
        self.ctx.auth_api.github_login_url()
    }

    /// Finish GitHub sign-in from the callback's query string (`?token=...` or
    /// `?error=...`).
    pub async fn complete_oauth_callback(&self, query: &str) -> CoreResult<()> {
        let query = query.trim_start_matches('?');
        let mut token = None;
        let mut error = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "token" if !value.is_empty() => token = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(token) = token {
            log::info!("GitHub sign-in completed");
            return self.sign_in(token).await;
        }
        let message = oauth_error_message(error.as_deref().unwrap_or_default());
        log::warn!("GitHub sign-in failed: {}", error.as_deref().unwrap_or("no token"));
        self.ctx.navigator.navigate(Route::Login);
        Err(CoreError::InvalidInput(message.to_string()))
    }

    async fn sign_in(&self, token: String) -> CoreResult<()> {
        self.ctx
            .session
            .set(token)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        self.ctx.navigator.navigate(Route::Dashboard);
        Ok(())
    }
}

fn failed(e: zonedash_api::ApiError, fallback: &str) -> CoreError {
    if e.is_expected() {
        log::warn!("{fallback}: {e}");
    } else {
        log::error!("{fallback}: {e}");
    }
    CoreError::request(e, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{AuthCall, Harness, MockZoneApi, network_down, rejected};

    fn harness() -> Harness {
        Harness::at(MockZoneApi::new(), &Route::Login)
    }

    // ---- password policy ----

    #[test]
    fn policy_checks_each_rule() {
        let checks = PasswordPolicy::check("abc");
        assert!(!checks.min_length);
        assert!(checks.has_lower);
        assert!(!checks.has_upper);
        assert!(!checks.is_valid());

        assert!(PasswordPolicy::check("Secret#123").is_valid());
        assert!(!PasswordPolicy::check("Secret1234").is_valid());
        assert!(!PasswordPolicy::check("secret#123").is_valid());
        assert!(PasswordPolicy::check("Sécret 123").is_valid());
    }

    // ---- login ----

    #[tokio::test]
    async fn login_stores_token_and_navigates() {
        let h = harness();
        let auth = AuthService::new(h.ctx.clone());

        auth.login(" ada@example.com ", "pw").await.unwrap();
        assert_eq!(h.ctx.session.get().await.as_deref(), Some(h.auth.token()));
        assert_eq!(h.navigator.history(), vec![Route::Dashboard]);
        assert_eq!(h.auth.calls(), vec![AuthCall::Login("ada@example.com".to_string())]);
    }

    #[tokio::test]
    async fn login_failure_shows_server_error() {
        let h = harness();
        h.auth.fail("login", rejected(400, "Invalid credentials"));
        let auth = AuthService::new(h.ctx.clone());

        let err = auth.login("ada@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!h.ctx.session.is_authenticated().await);
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn login_failure_without_message_uses_fallback() {
        let h = harness();
        h.auth.fail("login", network_down());
        let auth = AuthService::new(h.ctx.clone());
        let err = auth.login("ada@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    // ---- signup ----

    #[tokio::test]
    async fn weak_password_never_requests_otp() {
        let h = harness();
        let auth = AuthService::new(h.ctx.clone());
        let err = auth
            .start_signup("Ada", "ada@example.com", "password")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), WEAK_PASSWORD);
        assert!(h.auth.calls().is_empty());
    }

    #[tokio::test]
    async fn signup_two_steps() {
        let h = harness();
        let auth = AuthService::new(h.ctx.clone());
        auth.start_signup("Ada", "ada@example.com", "Secret#123")
            .await
            .unwrap();
        assert!(!h.ctx.session.is_authenticated().await);

        let draft = SignupDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Secret#123".to_string(),
            otp: " 123456 ".to_string(),
        };
        auth.complete_signup(&draft).await.unwrap();
        assert!(h.ctx.session.is_authenticated().await);
        assert_eq!(
            h.auth.calls(),
            vec![
                AuthCall::SendSignupOtp("ada@example.com".to_string()),
                AuthCall::VerifySignupOtp("123456".to_string())
            ]
        );
        assert_eq!(h.navigator.history(), vec![Route::Dashboard]);
    }

    #[tokio::test]
    async fn bad_otp_uses_verification_fallback() {
        let h = harness();
        h.auth.fail("verify_signup_otp", network_down());
        let auth = AuthService::new(h.ctx.clone());
        let draft = SignupDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Secret#123".to_string(),
            otp: "000000".to_string(),
        };
        let err = auth.complete_signup(&draft).await.unwrap_err();
        assert_eq!(err.to_string(), "Verification failed");
    }

    // ---- password reset / change ----

    #[tokio::test]
    async fn reset_flow() {
        let h = harness();
        let auth = AuthService::new(h.ctx.clone());
        assert_eq!(
            auth.request_password_reset("ada@example.com").await.unwrap(),
            RESET_CODE_SENT
        );

        let err = auth
            .reset_password("ada@example.com", "123456", "weak")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), WEAK_NEW_PASSWORD);

        assert_eq!(
            auth.reset_password("ada@example.com", "123456", "Secret#123")
                .await
                .unwrap(),
            PASSWORD_RESET_DONE
        );
        assert_eq!(h.navigator.history(), vec![Route::Login]);
        assert_eq!(h.auth.calls().len(), 2);
    }

    #[tokio::test]
    async fn change_password_checks_fields_first() {
        let h = harness();
        let auth = AuthService::new(h.ctx.clone());

        let err = auth.request_password_change("", "whatever1").await.unwrap_err();
        assert_eq!(err.to_string(), FIELDS_REQUIRED);
        let err = auth.request_password_change("old", "short").await.unwrap_err();
        assert_eq!(err.to_string(), NEW_PASSWORD_TOO_SHORT);
        assert!(h.auth.calls().is_empty());

        assert_eq!(
            auth.request_password_change("old", "longenough").await.unwrap(),
            PASSWORD_OTP_SENT
        );
        assert_eq!(
            auth.change_password("old", "longenough", "123456").await.unwrap(),
            PASSWORD_UPDATED
        );
        assert_eq!(
            h.auth.calls(),
            vec![AuthCall::SendPasswordOtp, AuthCall::ChangePassword]
        );
    }

    #[tokio::test]
    async fn change_password_failure_fallback() {
        let h = harness();
        h.auth.fail("change_password", network_down());
        let auth = AuthService::new(h.ctx.clone());
        let err = auth.change_password("old", "new", "1").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to update password");
    }

    // ---- session ----

    #[tokio::test]
    async fn failed_session_check_signs_out() {
        let h = Harness::at(MockZoneApi::new(), &Route::Dashboard);
        h.ctx.session.set("stale").await.unwrap();
        h.auth.fail("me", rejected(500, "boom"));
        let auth = AuthService::new(h.ctx.clone());

        assert!(auth.check_session().await.is_err());
        assert!(!h.ctx.session.is_authenticated().await);
        assert_eq!(h.navigator.history(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn logout_clears_and_goes_to_login() {
        let h = Harness::at(MockZoneApi::new(), &Route::Settings);
        h.ctx.session.set("abc").await.unwrap();
        let auth = AuthService::new(h.ctx.clone());

        auth.logout().await.unwrap();
        assert!(h.ctx.session.get().await.is_none());
        assert_eq!(h.navigator.history(), vec![Route::Login]);
    }

    // ---- oauth ----

    #[tokio::test]
    async fn oauth_callback_with_token() {
        let h = Harness::at(MockZoneApi::new(), &Route::OAuthCallback);
        let auth = AuthService::new(h.ctx.clone());

        auth.complete_oauth_callback("?token=gh%2Dtoken").await.unwrap();
        assert_eq!(h.ctx.session.get().await.as_deref(), Some("gh-token"));
        assert_eq!(h.navigator.history(), vec![Route::Dashboard]);
    }

    #[tokio::test]
    async fn oauth_callback_error_codes() {
        let h = Harness::at(MockZoneApi::new(), &Route::OAuthCallback);
        let auth = AuthService::new(h.ctx.clone());

        let err = auth
            .complete_oauth_callback("error=no_account")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No account found. Please create an account first using email and password."
        );
        let err = auth
            .complete_oauth_callback("error=something_else")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), OAUTH_FAILED);
        assert!(!h.ctx.session.is_authenticated().await);
        assert_eq!(h.navigator.history(), vec![Route::Login, Route::Login]);
    }

    #[test]
    fn github_url_comes_from_client() {
        let h = harness();
        let auth = AuthService::new(h.ctx.clone());
        assert!(auth.github_login_url().ends_with("/auth/github"));
    }
}
