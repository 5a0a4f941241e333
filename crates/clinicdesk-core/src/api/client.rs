//! API client for the clinic platform's admin endpoints.
//!
//! Every call is a single attempt: no retries, no backoff. Callers decide
//! whether and when to try again.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::models::{AllDoctorsResponse, DoctorRecord, LoginResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Request header carrying the raw admin token.
pub const TOKEN_HEADER: &str = "atoken";

const ALL_DOCTORS_PATH: &str = "/api/admin/all-doctors";

const LOGIN_PATH: &str = "/api/admin/login";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fallback when the backend rejects a call without a message.
const DEFAULT_REJECTION_MESSAGE: &str = "Request rejected by server";

/// API client for the admin backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AdminApiClient {
    client: Client,
    base_url: String,
}

impl AdminApiClient {
    /// Create a client for the given backend URL (without the `/api` suffix).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse response body");
            ApiError::InvalidResponse(format!("{} (from {})", e, path))
        })
    }

    // ===== Admin Endpoints =====

    /// Fetch every doctor registered on the platform.
    ///
    /// An empty token is refused locally; no request is sent.
    pub async fn fetch_all_doctors(&self, token: &str) -> Result<Vec<DoctorRecord>, ApiError> {
        if token.is_empty() {
            return Err(ApiError::MissingToken);
        }

        let response: AllDoctorsResponse = self
            .post(ALL_DOCTORS_PATH, Some(token), &json!({}))
            .await?;

        if response.success {
            debug!(count = response.doctors.len(), "Fetched doctor directory");
            Ok(response.doctors)
        } else {
            Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
            ))
        }
    }

    /// Log in as admin and return the session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self.post(LOGIN_PATH, None, &body).await?;

        match (response.success, response.token) {
            (true, Some(token)) if !token.is_empty() => Ok(token),
            (true, _) => Err(ApiError::InvalidResponse(
                "login succeeded without a token".to_string(),
            )),
            (false, _) => Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_fetch_all_doctors_success() {
        let mut server = Server::new_async().await;
        let endpoint = server
            .mock("POST", ALL_DOCTORS_PATH)
            .match_header(TOKEN_HEADER, "tok1")
            .match_body(Matcher::Json(json!({})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"doctors":[{"id":1},{"id":2}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = AdminApiClient::new(server.url()).unwrap();
        let doctors = client.fetch_all_doctors("tok1").await.unwrap();

        assert_eq!(
            doctors,
            vec![
                DoctorRecord::new(json!({"id": 1})),
                DoctorRecord::new(json!({"id": 2})),
            ]
        );
        endpoint.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_all_doctors_rejected() {
        let mut server = Server::new_async().await;
        let endpoint = server
            .mock("POST", ALL_DOCTORS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"message":"Invalid token"}"#)
            .create_async()
            .await;

        let client = AdminApiClient::new(server.url()).unwrap();
        let result = client.fetch_all_doctors("tok1").await;

        assert!(matches!(result, Err(ApiError::Rejected(ref m)) if m == "Invalid token"));
        endpoint.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_all_doctors_empty_token_sends_nothing() {
        let mut server = Server::new_async().await;
        let endpoint = server
            .mock("POST", ALL_DOCTORS_PATH)
            .expect(0)
            .create_async()
            .await;

        let client = AdminApiClient::new(server.url()).unwrap();
        let result = client.fetch_all_doctors("").await;

        assert!(matches!(result, Err(ApiError::MissingToken)));
        endpoint.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_all_doctors_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", ALL_DOCTORS_PATH)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = AdminApiClient::new(server.url()).unwrap();
        let result = client.fetch_all_doctors("tok1").await;

        assert!(matches!(result, Err(ApiError::ServerError(ref b)) if b == "boom"));
    }

    #[tokio::test]
    async fn test_fetch_all_doctors_malformed_json() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", ALL_DOCTORS_PATH)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = AdminApiClient::new(server.url()).unwrap();
        let result = client.fetch_all_doctors("tok1").await;

        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_doctors_network_error() {
        // Nothing listens on port 1
        let client = AdminApiClient::new("http://127.0.0.1:1").unwrap();
        let result = client.fetch_all_doctors("tok1").await;

        assert!(matches!(result, Err(ApiError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut server = Server::new_async().await;
        let endpoint = server
            .mock("POST", LOGIN_PATH)
            .match_body(Matcher::Json(
                json!({"email": "admin@example.com", "password": "secret"}),
            ))
            .with_status(200)
            .with_body(r#"{"success":true,"token":"tok-new"}"#)
            .create_async()
            .await;

        let client = AdminApiClient::new(format!("{}/", server.url())).unwrap();
        let token = client.login("admin@example.com", "secret").await.unwrap();

        assert_eq!(token, "tok-new");
        endpoint.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", LOGIN_PATH)
            .with_status(200)
            .with_body(r#"{"success":false,"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let client = AdminApiClient::new(server.url()).unwrap();
        let result = client.login("admin@example.com", "wrong").await;

        assert!(matches!(result, Err(ApiError::Rejected(ref m)) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_trimmed() {
        let mut server = Server::new_async().await;
        let endpoint = server
            .mock("POST", ALL_DOCTORS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"doctors":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = AdminApiClient::new(format!("{}///", server.url())).unwrap();
        let doctors = client.fetch_all_doctors("tok1").await.unwrap();

        assert!(doctors.is_empty());
        endpoint.assert_async().await;
    }
}
