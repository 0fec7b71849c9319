//! Generic HTTP request tools
//!
//! Sending, logging and body reading shared by every endpoint of [`ApiClient`](crate::ApiClient).
//! Status classification (401 / 429 / rejected) lives in the client; this module only
//! turns transport failures into [`ApiError`] and hands back the raw answer.
//!
//! Nothing here retries. Every retry is a user action.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Status, `Retry-After` and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// `Retry-After` header in seconds, when the server sent one.
    pub retry_after: Option<u64>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the raw answer
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `method_name` - request method (for logs)
    /// * `path` - API path (for logs)
    ///
    /// # Returns
    /// * `Ok(RawResponse)` - any HTTP status, including non-2xx
    /// * `Err(ApiError::Timeout)` / `Err(ApiError::NetworkError)` - transport failure
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
    ) -> Result<RawResponse, ApiError> {
        log::debug!("{method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("{method_name} {path} -> {status}");

        // Read before the body consumes the response
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?
            .to_vec();

        log::debug!(
            "Response Body: {}",
            truncate_for_log(&String::from_utf8_lossy(&body))
        );

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(body: &[u8]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(body).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!(
                "Raw response: {}",
                truncate_for_log(&String::from_utf8_lossy(body))
            );
            ApiError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// Pull the server's message and observed nameservers out of an error body.
    ///
    /// Accepts `{"error": ...}` or `{"message": ...}`; anything that is not JSON
    /// yields no message so the caller falls back to its own wording. Each field
    /// is read on its own, so a malformed `current` never hides the message.
    pub fn extract_error(body: &[u8]) -> (Option<String>, Option<Vec<String>>) {
        let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
            return (None, None);
        };
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
        };
        let message = text("error").or_else(|| text("message"));
        let current = match fields.get("current") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
            ),
            Some(Value::String(single)) => Some(vec![single.clone()]),
            _ => None,
        };
        (message, current)
    }
}
