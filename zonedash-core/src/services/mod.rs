//! Request/response services that need no view state.

mod auth;
mod checker;

pub use auth::{
    AuthService, FIELDS_REQUIRED, NEW_PASSWORD_TOO_SHORT, PASSWORD_OTP_SENT, PASSWORD_RESET_DONE,
    PASSWORD_UPDATED, PasswordChecks, PasswordPolicy, RESET_CODE_SENT, SignupDraft, WEAK_NEW_PASSWORD,
    WEAK_PASSWORD, oauth_error_message,
};
pub use checker::{DEFAULT_LOOKUP_TYPE, DOMAIN_REQUIRED, DnsChecker, LOOKUP_TYPES};
