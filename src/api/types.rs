//! Wire types and the gateway trait for the portal API.

use serde::{Deserialize, Serialize};

use crate::models::{MedicalFile, PatientProfile, Role, Treatment, User};

use super::error::ApiError;

// ═══════════════════════════════════════════════════════════
// Response envelope
// ═══════════════════════════════════════════════════════════

/// Uniform wrapper on every portal response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field-level validation details. Opaque to this client; the
    /// `message` is what gets surfaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

// ═══════════════════════════════════════════════════════════
// Request payloads
// ═══════════════════════════════════════════════════════════

/// Starts an OTP-gated registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(rename = "cnic")]
    pub national_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Payload for creating a treatment. The authoring doctor's identity is
/// derived server-side from the bearer token, never trusted from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTreatment {
    pub patient_id: String,
    pub diagnosis: String,
    pub medication: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attachments: Vec<MedicalFile>,
}

// ═══════════════════════════════════════════════════════════
// Response payloads
// ═══════════════════════════════════════════════════════════

/// A finalized user plus the bearer token that authorizes it.
/// The gateway never applies the token itself; persisting it is the
/// auth flow's decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

// ═══════════════════════════════════════════════════════════
// Gateway trait
// ═══════════════════════════════════════════════════════════

/// Typed operations the portal server exposes.
///
/// Controllers are generic over this trait; `ApiClient` is the HTTP
/// implementation and `MockApi` the test double. Every operation is
/// at-most-once: the gateway never retries, callers decide whether to
/// re-invoke.
#[allow(async_fn_in_trait)]
pub trait PortalApi {
    /// Start an OTP-gated registration. Acknowledgement only; the
    /// account stays pending until the OTP is verified.
    async fn signup(&self, req: &SignupRequest) -> Result<(), ApiError>;

    /// Consume an OTP and finalize the account.
    async fn verify_otp(&self, email: &str, code: &str) -> Result<AuthSession, ApiError>;

    /// Reissue an OTP for a pending registration.
    async fn resend_otp(&self, email: &str) -> Result<(), ApiError>;

    /// Exchange credentials for a user and bearer token.
    async fn login(&self, email: &str, password: &str, role: Role) -> Result<AuthSession, ApiError>;

    /// Current user for the stored token. Embedded treatments/history
    /// arrive when the role is patient and default to empty.
    async fn get_profile(&self) -> Result<PatientProfile, ApiError>;

    /// Full patient roster. The server enforces the doctor role.
    async fn get_patients(&self) -> Result<Vec<PatientProfile>, ApiError>;

    /// Create a treatment record; returns the created record.
    async fn add_treatment(&self, req: &NewTreatment) -> Result<Treatment, ApiError>;

    /// Remove a treatment record as a whole.
    async fn delete_treatment(&self, id: &str) -> Result<(), ApiError>;
}
