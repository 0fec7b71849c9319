//! # zonedash-api
//!
//! Typed client for the zonedash DNS hosting REST API: zones, record sets,
//! delegation verification, zone file export, accounts, public stats and the
//! public DNS checker.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Session handling
//!
//! Every request reads the bearer token from a shared [`Session`]. A 401 from
//! any endpoint discards the token and sends the [`Navigator`] to
//! [`Route::Login`], except while the user is already on the login or signup
//! page.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zonedash_api::{ApiClient, ApiConfig, NullNavigator, Session, ZoneApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::in_memory();
//!     session.set("my-token").await?;
//!
//!     let client = ApiClient::new(
//!         ApiConfig::from_env(),
//!         session,
//!         Arc::new(NullNavigator::default()),
//!     )?;
//!
//!     for zone in client.list_zones().await? {
//!         println!("{} ({})", zone.name, zone.status.label());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All calls return [`Result<T, ApiError>`](ApiError). Server messages are kept
//! verbatim so callers can show them as-is:
//!
//! ```rust,no_run
//! # use zonedash_api::ApiError;
//! # fn handle(err: ApiError) {
//! match err {
//!     ApiError::Unauthorized { .. } => { /* already redirected to login */ }
//!     ApiError::RateLimited { retry_after, .. } => {
//!         println!("Slow down ({retry_after:?}s)");
//!     }
//!     other => println!("{}", other.reason()),
//! }
//! # }
//! ```

mod client;
mod config;
mod error;
mod http_client;
mod navigation;
mod session;
mod traits;
mod types;
mod utils;

pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_TIMEOUT_SECS};
pub use error::{ApiError, Result};
pub use navigation::{AuthGuard, Navigator, NullNavigator, Route};
pub use session::{MemoryTokenStore, Session, TokenStore};
pub use traits::{AuthApi, PublicApi, ZoneApi};
pub use types::{
    ChangePasswordRequest, CreateZoneRequest, DEFAULT_RECORD_LIMIT, DelegationCheck,
    DeleteRecordRequest, ForgotPasswordRequest, LoginRequest, LookupReport, MessageResponse,
    NewRecord, PropagationReport, PropagationSummary, PublicStats, RecordKey, RecordQuery,
    RecordSet, RecordType, RecordValue, ResetPasswordRequest, ResolverAnswer, SignupOtpRequest,
    TokenResponse, User, VerifySignupRequest, Zone, ZoneStatus,
};
pub use utils::log_sanitizer::{mask_token, truncate_for_log};
