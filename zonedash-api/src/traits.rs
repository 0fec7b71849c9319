use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ChangePasswordRequest, LoginRequest, LookupReport, MessageResponse, NewRecord,
    PropagationReport, PublicStats, RecordSet, RecordType, ResetPasswordRequest,
    SignupOtpRequest, TokenResponse, User, VerifySignupRequest, Zone,
};

/// Zone and record endpoints. All require a session token.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// `GET /zones`
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// `POST /zones`
    async fn create_zone(&self, name: &str) -> Result<Zone>;

    /// `DELETE /zones/:id`
    async fn delete_zone(&self, zone_id: &str) -> Result<MessageResponse>;

    /// `GET /zones/:id?rrsets=<bool>`
    ///
    /// With `include_rrsets = false` only the metadata is returned, which keeps
    /// the page header fast on large zones.
    async fn get_zone(&self, zone_id: &str, include_rrsets: bool) -> Result<Zone>;

    /// `GET /zones/:id/records?q=&max=`
    async fn search_records(&self, zone_id: &str, query: &str, max: u32)
    -> Result<Vec<RecordSet>>;

    /// `POST /zones/:id/records`
    async fn add_record(&self, zone_id: &str, record: &NewRecord) -> Result<MessageResponse>;

    /// `DELETE /zones/:id/records` with `{name, type}`. Removes the whole record set.
    async fn delete_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<MessageResponse>;

    /// `POST /zones/:id/verify`
    ///
    /// A failed verification comes back as [`ApiError::Rejected`](crate::ApiError::Rejected)
    /// carrying the nameservers currently observed for the zone.
    async fn verify_zone(&self, zone_id: &str) -> Result<MessageResponse>;

    /// `GET /zones/:id/export`, the zone file as raw bytes.
    async fn export_zone(&self, zone_id: &str) -> Result<Vec<u8>>;
}

/// Account endpoints. Each either yields a token, a message, or an error.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse>;

    /// `POST /auth/send-otp`, first step of signup.
    async fn send_signup_otp(&self, req: &SignupOtpRequest) -> Result<MessageResponse>;

    /// `POST /auth/verify-otp`, second step of signup.
    async fn verify_signup_otp(&self, req: &VerifySignupRequest) -> Result<TokenResponse>;

    /// `POST /auth/forgot-password`
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse>;

    /// `POST /auth/reset-password`
    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<MessageResponse>;

    /// `POST /auth/send-password-otp`, first step of a password change.
    async fn send_password_otp(&self) -> Result<MessageResponse>;

    /// `POST /auth/change-password`
    async fn change_password(&self, req: &ChangePasswordRequest) -> Result<MessageResponse>;

    /// `GET /auth/me`
    async fn me(&self) -> Result<User>;

    /// Browser entry point of the GitHub sign-in flow.
    fn github_login_url(&self) -> String;
}

/// Endpoints that work without a session.
#[async_trait]
pub trait PublicApi: Send + Sync {
    /// `GET /public/stats`
    async fn public_stats(&self) -> Result<PublicStats>;

    /// `GET /dns-checker/check/:domain/:type`
    async fn dns_lookup(&self, domain: &str, record_type: &str) -> Result<LookupReport>;

    /// `GET /dns-checker/propagation/:domain`
    async fn dns_propagation(&self, domain: &str) -> Result<PropagationReport>;
}
