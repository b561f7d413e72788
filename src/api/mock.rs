//! Configurable gateway double for controller tests.
//!
//! Each operation returns a preset outcome and records its invocation,
//! so tests can assert both the result handling and that client-side
//! validation failures never reach the network.

use std::sync::Mutex;

use crate::models::{PatientProfile, Role, Treatment};

use super::error::ApiError;
use super::types::{AuthSession, NewTreatment, PortalApi, SignupRequest};

/// Preset result for one operation. `Err` carries the message the
/// simulated server would reject with.
pub type Outcome<T> = Result<T, String>;

/// In-memory `PortalApi` with preset outcomes and a call log.
pub struct MockApi {
    calls: Mutex<Vec<&'static str>>,
    signup: Outcome<()>,
    verify_otp: Outcome<AuthSession>,
    resend_otp: Outcome<()>,
    login: Outcome<AuthSession>,
    profile: Outcome<PatientProfile>,
    patients: Outcome<Vec<PatientProfile>>,
    add_treatment: Outcome<Treatment>,
    delete_treatment: Outcome<()>,
}

impl MockApi {
    /// Mock where every operation rejects until configured otherwise.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            signup: Err("signup not configured".into()),
            verify_otp: Err("verify_otp not configured".into()),
            resend_otp: Err("resend_otp not configured".into()),
            login: Err("login not configured".into()),
            profile: Err("get_profile not configured".into()),
            patients: Err("get_patients not configured".into()),
            add_treatment: Err("add_treatment not configured".into()),
            delete_treatment: Err("delete_treatment not configured".into()),
        }
    }

    // ── Outcome configuration ────────────────────────────

    pub fn with_signup(mut self, outcome: Outcome<()>) -> Self {
        self.signup = outcome;
        self
    }

    pub fn with_verify_otp(mut self, outcome: Outcome<AuthSession>) -> Self {
        self.verify_otp = outcome;
        self
    }

    pub fn with_resend_otp(mut self, outcome: Outcome<()>) -> Self {
        self.resend_otp = outcome;
        self
    }

    pub fn with_login(mut self, outcome: Outcome<AuthSession>) -> Self {
        self.login = outcome;
        self
    }

    pub fn with_profile(mut self, outcome: Outcome<PatientProfile>) -> Self {
        self.profile = outcome;
        self
    }

    pub fn with_patients(mut self, outcome: Outcome<Vec<PatientProfile>>) -> Self {
        self.patients = outcome;
        self
    }

    pub fn with_add_treatment(mut self, outcome: Outcome<Treatment>) -> Self {
        self.add_treatment = outcome;
        self
    }

    pub fn with_delete_treatment(mut self, outcome: Outcome<()>) -> Self {
        self.delete_treatment = outcome;
        self
    }

    // ── Call log ─────────────────────────────────────────

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// How many times one operation was invoked.
    pub fn call_count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| **c == op).count()
    }

    fn record(&self, op: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(op);
        }
    }

    fn resolve<T: Clone>(outcome: &Outcome<T>) -> Result<T, ApiError> {
        outcome.clone().map_err(|message| ApiError::Server {
            status: 400,
            message,
        })
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalApi for MockApi {
    async fn signup(&self, _req: &SignupRequest) -> Result<(), ApiError> {
        self.record("signup");
        Self::resolve(&self.signup)
    }

    async fn verify_otp(&self, _email: &str, _code: &str) -> Result<AuthSession, ApiError> {
        self.record("verify_otp");
        Self::resolve(&self.verify_otp)
    }

    async fn resend_otp(&self, _email: &str) -> Result<(), ApiError> {
        self.record("resend_otp");
        Self::resolve(&self.resend_otp)
    }

    async fn login(&self, _email: &str, _password: &str, _role: Role) -> Result<AuthSession, ApiError> {
        self.record("login");
        Self::resolve(&self.login)
    }

    async fn get_profile(&self) -> Result<PatientProfile, ApiError> {
        self.record("get_profile");
        Self::resolve(&self.profile)
    }

    async fn get_patients(&self) -> Result<Vec<PatientProfile>, ApiError> {
        self.record("get_patients");
        Self::resolve(&self.patients)
    }

    async fn add_treatment(&self, _req: &NewTreatment) -> Result<Treatment, ApiError> {
        self.record("add_treatment");
        Self::resolve(&self.add_treatment)
    }

    async fn delete_treatment(&self, _id: &str) -> Result<(), ApiError> {
        self.record("delete_treatment");
        Self::resolve(&self.delete_treatment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_operation_rejects() {
        let api = MockApi::new();
        let err = api.resend_otp("a@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "resend_otp not configured");
    }

    #[tokio::test]
    async fn configured_outcome_is_returned_and_logged() {
        let api = MockApi::new().with_signup(Ok(()));
        api.signup(&SignupRequest {
            national_id: "42101-1234567-1".into(),
            name: "Ayesha".into(),
            email: "a@example.com".into(),
            password: "secret1".into(),
            role: Role::Patient,
        })
        .await
        .unwrap();

        assert_eq!(api.calls(), vec!["signup"]);
        assert_eq!(api.call_count("signup"), 1);
        assert_eq!(api.call_count("login"), 0);
    }
}
