//! HTTP implementation of the portal gateway.
//!
//! One network call per operation against the configured base URL, the
//! bearer token attached whenever the session store holds one, responses
//! normalized through the shared envelope. No retries: a failed call is
//! reported once and the caller decides whether to re-invoke.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config;
use crate::models::{PatientProfile, Role, Treatment};
use crate::session_store::SessionStore;

use super::error::{ApiError, GENERIC_SERVER_MESSAGE};
use super::types::{
    ApiEnvelope, AuthSession, LoginRequest, NewTreatment, PortalApi, ResendOtpRequest,
    SignupRequest, VerifyOtpRequest,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// ═══════════════════════════════════════════════════════════
// ApiClient
// ═══════════════════════════════════════════════════════════

/// Reqwest-backed portal gateway.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Gateway against an explicit base URL. Trailing slashes are
    /// stripped so path joining stays uniform.
    pub fn new(base_url: &str, store: Arc<SessionStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
        }
    }

    /// Gateway against the configured base URL
    /// (`MEDIPORT_API_URL`, fixed remote default).
    pub fn from_config(store: Arc<SessionStore>) -> Self {
        Self::new(&config::api_base_url(), store)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` when a token is stored.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ── Request helpers ──────────────────────────────────

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.http.get(self.url(path));
        self.unwrap_data(self.exchange(path, builder).await?)
    }

    async fn post_data<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.http.post(self.url(path)).json(body);
        self.unwrap_data(self.exchange(path, builder).await?)
    }

    async fn post_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let builder = self.http.post(self.url(path)).json(body);
        self.exchange::<serde_json::Value>(path, builder).await?;
        Ok(())
    }

    async fn delete_ack(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.http.delete(self.url(path));
        self.exchange::<serde_json::Value>(path, builder).await?;
        Ok(())
    }

    fn unwrap_data<T>(&self, envelope: ApiEnvelope<T>) -> Result<T, ApiError> {
        envelope
            .data
            .ok_or_else(|| ApiError::MalformedResponse("envelope carried no data".into()))
    }

    /// Send one request and normalize the outcome: transport failures
    /// become the generic network error, non-success statuses and
    /// `success: false` envelopes become a server rejection carrying the
    /// server's message (or the generic fallback).
    async fn exchange<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(path, "Portal request failed in transit: {e}");
                ApiError::Network(e)
            })?;

        let status = response.status();
        let envelope: ApiEnvelope<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) if !status.is_success() => {
                // Rejection with an unreadable body still surfaces as a
                // server rejection, just without a specific message.
                tracing::debug!(path, status = status.as_u16(), "Undecodable rejection body: {e}");
                return Err(ApiError::Server {
                    status: status.as_u16(),
                    message: GENERIC_SERVER_MESSAGE.to_string(),
                });
            }
            Err(e) => return Err(ApiError::MalformedResponse(e.to_string())),
        };

        if !status.is_success() || !envelope.success {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string());
            tracing::debug!(path, status = status.as_u16(), message, "Portal rejected operation");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope)
    }
}

// ═══════════════════════════════════════════════════════════
// PortalApi implementation
// ═══════════════════════════════════════════════════════════

impl PortalApi for ApiClient {
    async fn signup(&self, req: &SignupRequest) -> Result<(), ApiError> {
        self.post_ack("/auth/signup", req).await
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<AuthSession, ApiError> {
        let body = VerifyOtpRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        self.post_data("/auth/verify-otp", &body).await
    }

    async fn resend_otp(&self, email: &str) -> Result<(), ApiError> {
        let body = ResendOtpRequest {
            email: email.to_string(),
        };
        self.post_ack("/auth/resend-otp", &body).await
    }

    async fn login(&self, email: &str, password: &str, role: Role) -> Result<AuthSession, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        self.post_data("/auth/login", &body).await
    }

    async fn get_profile(&self) -> Result<PatientProfile, ApiError> {
        self.get_data("/auth/profile").await
    }

    async fn get_patients(&self) -> Result<Vec<PatientProfile>, ApiError> {
        self.get_data("/auth/patients").await
    }

    async fn add_treatment(&self, req: &NewTreatment) -> Result<Treatment, ApiError> {
        self.post_data("/auth/treatments", req).await
    }

    async fn delete_treatment(&self, id: &str) -> Result<(), ApiError> {
        self.delete_ack(&format!("/auth/treatments/{id}")).await
    }
}

// ═══════════════════════════════════════════════════════════
// Tests — real HTTP round-trips against an ephemeral server
// ═══════════════════════════════════════════════════════════
