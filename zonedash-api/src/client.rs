//! REST client for the zonedash backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::http_client::{HttpUtils, RawResponse};
use crate::navigation::{AuthGuard, Navigator};
use crate::session::Session;
use crate::traits::{AuthApi, PublicApi, ZoneApi};
use crate::types::{
    ChangePasswordRequest, CreateZoneRequest, DeleteRecordRequest, ForgotPasswordRequest,
    LoginRequest, LookupReport, MessageResponse, NewRecord, PropagationReport, PublicStats,
    RecordQuery, RecordSet, RecordType, ResetPasswordRequest, SignupOtpRequest, TokenResponse,
    User, VerifySignupRequest, Zone,
};

/// HTTP binding of every backend endpoint.
///
/// Each call reads the bearer token from the shared [`Session`] and funnels
/// 401 answers through a single [`AuthGuard`]. Responses are never cached.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    session: Session,
    guard: AuthGuard,
}

impl ApiClient {
    /// Build a client. Fails when the base URL is not an absolute URL or the
    /// HTTP stack cannot be initialised.
    pub fn new(config: ApiConfig, session: Session, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let base = url::Url::parse(&config.base_url).map_err(|e| ApiError::NetworkError {
            detail: format!("Invalid API base URL '{}': {e}", config.base_url),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::NetworkError {
                detail: format!("Invalid API base URL '{}'", config.base_url),
            });
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::NetworkError {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;

        let guard = AuthGuard::new(session.clone(), navigator);
        Ok(Self {
            http,
            config,
            session,
            guard,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ============ Request funnel ============

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.url(path))
    }

    fn with_json<B: Serialize + ?Sized>(builder: RequestBuilder, body: &B) -> Result<RequestBuilder> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::SerializationError {
            detail: e.to_string(),
        })?;
        Ok(builder
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(bytes))
    }

    /// Send one request and classify the answer.
    ///
    /// 2xx is returned as-is. 401 runs the unauthorized hook before surfacing
    /// [`ApiError::Unauthorized`]; 429 becomes [`ApiError::RateLimited`]; any
    /// other status becomes [`ApiError::Rejected`] with the server's message.
    async fn send(&self, builder: RequestBuilder, method: &Method, path: &str) -> Result<RawResponse> {
        let builder = match self.session.get().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let raw = HttpUtils::execute_request(builder, method.as_str(), path).await?;
        if raw.is_success() {
            return Ok(raw);
        }

        let (message, current) = HttpUtils::extract_error(&raw.body);
        let error = match raw.status {
            401 => {
                self.guard.on_unauthorized().await;
                ApiError::Unauthorized {
                    raw_message: message,
                }
            }
            429 => ApiError::RateLimited {
                retry_after: raw.retry_after,
                raw_message: message,
            },
            status => ApiError::Rejected {
                status,
                message,
                current,
            },
        };

        if error.is_expected() {
            log::warn!("{method} {path} failed: {error}");
        } else {
            log::error!("{method} {path} failed: {error}");
        }
        Err(error)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let raw = self.send(self.request(Method::GET, path), &Method::GET, path).await?;
        HttpUtils::parse_json(&raw.body)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = Self::with_json(builder, body)?;
        }
        let raw = self.send(builder, &method, path).await?;
        HttpUtils::parse_json(&raw.body)
    }

    /// Like [`send_json`](Self::send_json) but tolerates an empty or non-JSON
    /// acknowledgement body.
    async fn send_ack<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<MessageResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = Self::with_json(builder, body)?;
        }
        let raw = self.send(builder, &method, path).await?;
        Ok(serde_json::from_slice(&raw.body).unwrap_or_default())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

fn zone_path(zone_id: &str) -> String {
    format!("/zones/{}", urlencoding::encode(zone_id))
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl ZoneApi for ApiClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.get_json("/zones").await
    }

    async fn create_zone(&self, name: &str) -> Result<Zone> {
        let body = CreateZoneRequest {
            name: name.to_string(),
        };
        self.send_json(Method::POST, "/zones", Some(&body)).await
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<MessageResponse> {
        self.send_ack(Method::DELETE, &zone_path(zone_id), NO_BODY)
            .await
    }

    async fn get_zone(&self, zone_id: &str, include_rrsets: bool) -> Result<Zone> {
        let path = format!("{}?rrsets={include_rrsets}", zone_path(zone_id));
        self.get_json(&path).await
    }

    async fn search_records(
        &self,
        zone_id: &str,
        query: &str,
        max: u32,
    ) -> Result<Vec<RecordSet>> {
        let path = format!("{}/records", zone_path(zone_id));
        let params = RecordQuery {
            q: query.to_string(),
            max,
        };
        let builder = self.request(Method::GET, &path).query(&params);
        let raw = self.send(builder, &Method::GET, &path).await?;
        HttpUtils::parse_json(&raw.body)
    }

    async fn add_record(&self, zone_id: &str, record: &NewRecord) -> Result<MessageResponse> {
        let path = format!("{}/records", zone_path(zone_id));
        self.send_ack(Method::POST, &path, Some(record)).await
    }

    async fn delete_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<MessageResponse> {
        let path = format!("{}/records", zone_path(zone_id));
        let body = DeleteRecordRequest {
            name: name.to_string(),
            record_type,
        };
        self.send_ack(Method::DELETE, &path, Some(&body)).await
    }

    async fn verify_zone(&self, zone_id: &str) -> Result<MessageResponse> {
        let path = format!("{}/verify", zone_path(zone_id));
        self.send_ack(Method::POST, &path, NO_BODY).await
    }

    async fn export_zone(&self, zone_id: &str) -> Result<Vec<u8>> {
        let path = format!("{}/export", zone_path(zone_id));
        let raw = self
            .send(self.request(Method::GET, &path), &Method::GET, &path)
            .await?;
        Ok(raw.body)
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse> {
        self.send_json(Method::POST, "/auth/login", Some(req)).await
    }

    async fn send_signup_otp(&self, req: &SignupOtpRequest) -> Result<MessageResponse> {
        self.send_ack(Method::POST, "/auth/send-otp", Some(req)).await
    }

    async fn verify_signup_otp(&self, req: &VerifySignupRequest) -> Result<TokenResponse> {
        self.send_json(Method::POST, "/auth/verify-otp", Some(req))
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.send_ack(Method::POST, "/auth/forgot-password", Some(&body))
            .await
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<MessageResponse> {
        self.send_ack(Method::POST, "/auth/reset-password", Some(req))
            .await
    }

    async fn send_password_otp(&self) -> Result<MessageResponse> {
        self.send_ack(Method::POST, "/auth/send-password-otp", NO_BODY)
            .await
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> Result<MessageResponse> {
        self.send_ack(Method::POST, "/auth/change-password", Some(req))
            .await
    }

    async fn me(&self) -> Result<User> {
        self.get_json("/auth/me").await
    }

    fn github_login_url(&self) -> String {
        self.config.url("/auth/github")
    }
}

#[async_trait]
impl PublicApi for ApiClient {
    async fn public_stats(&self) -> Result<PublicStats> {
        self.get_json("/public/stats").await
    }

    async fn dns_lookup(&self, domain: &str, record_type: &str) -> Result<LookupReport> {
        let path = format!(
            "/dns-checker/check/{}/{}",
            urlencoding::encode(domain),
            urlencoding::encode(record_type)
        );
        self.get_json(&path).await
    }

    async fn dns_propagation(&self, domain: &str) -> Result<PropagationReport> {
        let path = format!("/dns-checker/propagation/{}", urlencoding::encode(domain));
        self.get_json(&path).await
    }
}
