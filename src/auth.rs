//! Authentication flow — role selection → credentials → OTP verification.
//!
//! `AuthFlow` owns the pre-login UI state machine. Key properties:
//! - Sign-up is validated locally before any network call
//! - The OTP step is reachable only through a successful signup response
//! - Verification never auto-authenticates; the user signs in afterwards
//! - Each async submit path has its own busy flag, so unrelated controls
//!   stay interactive while one operation is in flight

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;

use crate::api::types::{PortalApi, SignupRequest};
use crate::models::{Role, User};
use crate::session_store::SessionStore;

/// Seconds an OTP stays valid after the initial signup.
const SIGNUP_OTP_WINDOW_SECS: u32 = 300;
/// Cooldown applied after a resend.
const RESEND_COOLDOWN_SECS: u32 = 120;
/// OTP codes are exactly six digits.
const OTP_LENGTH: usize = 6;
/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

// ═══════════════════════════════════════════════════════════
// Local validation
// ═══════════════════════════════════════════════════════════

fn national_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{5}-\d{7}-\d$").expect("valid national-id pattern"))
}

/// Five digits, hyphen, seven digits, hyphen, one digit.
pub fn is_valid_national_id(value: &str) -> bool {
    national_id_pattern().is_match(value)
}

/// Exactly six ASCII digits.
pub fn is_valid_otp(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Fields entered on the sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub national_id: String,
    pub password: String,
}

/// Validate a sign-up form locally. Returns the first violation as a
/// user-facing message; the server is contacted only once this passes.
pub fn validate_signup(form: &SignupForm) -> Result<(), String> {
    if form.name.trim().is_empty() {
        return Err("Name is required".into());
    }
    if form.email.trim().is_empty() {
        return Err("Email is required".into());
    }
    if form.national_id.trim().is_empty() {
        return Err("National ID is required".into());
    }
    if form.password.is_empty() {
        return Err("Password is required".into());
    }
    if !is_valid_national_id(form.national_id.trim()) {
        return Err("National ID must match the format 12345-1234567-1".into());
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters".into());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Countdown — OTP expiry / resend gate
// ═══════════════════════════════════════════════════════════

/// One-second-tick countdown.
///
/// The tick runs as a background task decrementing a shared
/// remaining-seconds value; it exits on reaching zero and is aborted on
/// restart or drop, so no periodic callback can outlive its owner.
pub struct Countdown {
    remaining: Arc<AtomicU32>,
    ticker: Option<tokio::task::JoinHandle<()>>,
}

impl Countdown {
    /// A countdown that has not started; reads as elapsed.
    pub fn idle() -> Self {
        Self {
            remaining: Arc::new(AtomicU32::new(0)),
            ticker: None,
        }
    }

    /// Start (or restart) at `secs`. Must be called within a tokio runtime.
    pub fn start(&mut self, secs: u32) {
        self.cancel();
        self.remaining.store(secs, Ordering::Relaxed);
        if secs == 0 {
            return;
        }
        let remaining = Arc::clone(&self.remaining);
        self.ticker = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            tick.tick().await; // first tick completes immediately
            loop {
                tick.tick().await;
                let left = remaining.load(Ordering::Relaxed).saturating_sub(1);
                remaining.store(left, Ordering::Relaxed);
                if left == 0 {
                    break;
                }
            }
        }));
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining_secs() == 0
    }

    /// Stop ticking without touching the remaining value.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    /// Stop ticking and read as elapsed.
    pub fn reset(&mut self) {
        self.cancel();
        self.remaining.store(0, Ordering::Relaxed);
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ═══════════════════════════════════════════════════════════
// Flow state
// ═══════════════════════════════════════════════════════════

/// Which screen the pre-login flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    RoleSelection,
    CredentialForm,
    OtpVerification,
}

/// Mode toggle within the credential form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    SignIn,
    SignUp,
}

/// Per-operation in-flight flags. A control is disabled only while its
/// own operation is pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyFlags {
    pub submitting: bool,
    pub verifying: bool,
    pub resending: bool,
}

/// The role-selection → credential-form → OTP-verification state machine.
pub struct AuthFlow {
    view: AuthView,
    mode: FormMode,
    role: Option<Role>,
    pending_email: Option<String>,
    otp_input: String,
    countdown: Countdown,
    busy: BusyFlags,
    error: Option<String>,
    notice: Option<String>,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self {
            view: AuthView::RoleSelection,
            mode: FormMode::SignIn,
            role: None,
            pending_email: None,
            otp_input: String::new(),
            countdown: Countdown::idle(),
            busy: BusyFlags::default(),
            error: None,
            notice: None,
        }
    }

    // ── State access ─────────────────────────────────────

    pub fn view(&self) -> AuthView {
        self.view
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Email the OTP step is verifying, carried over from signup.
    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    pub fn otp_input(&self) -> &str {
        &self.otp_input
    }

    /// Seconds until the current OTP window closes / resend unlocks.
    pub fn countdown_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    /// Failure message for the control that last failed, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation message, e.g. after successful verification.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ── Transitions ──────────────────────────────────────

    /// Role chosen on the landing screen; the credential form opens in
    /// sign-in mode.
    pub fn select_role(&mut self, role: Role) {
        self.role = Some(role);
        self.view = AuthView::CredentialForm;
        self.mode = FormMode::SignIn;
        self.error = None;
    }

    /// Toggle between sign-in and sign-up within the credential form.
    pub fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
        self.error = None;
    }

    pub fn set_otp_input(&mut self, code: &str) {
        self.otp_input = code.trim().to_string();
    }

    // ── Control gating ───────────────────────────────────

    pub fn can_submit_sign_in(&self, email: &str, password: &str) -> bool {
        !self.busy.submitting && !email.trim().is_empty() && !password.is_empty()
    }

    pub fn can_verify(&self) -> bool {
        !self.busy.verifying && is_valid_otp(&self.otp_input)
    }

    pub fn can_resend(&self) -> bool {
        !self.busy.resending && self.countdown.is_elapsed()
    }

    // ── Sign in ──────────────────────────────────────────

    /// Submit credentials. On success the token is persisted and the
    /// finalized user is returned; on failure the flow stays put and the
    /// server's message is surfaced.
    pub async fn submit_sign_in(
        &mut self,
        api: &impl PortalApi,
        store: &SessionStore,
        email: &str,
        password: &str,
    ) -> Option<User> {
        let Some(role) = self.role else {
            self.error = Some("Select a role to continue".into());
            return None;
        };
        if !self.can_submit_sign_in(email, password) {
            if !self.busy.submitting {
                self.error = Some("Email and password are required".into());
            }
            return None;
        }

        self.busy.submitting = true;
        self.error = None;
        let result = api.login(email.trim(), password, role).await;
        self.busy.submitting = false;

        match result {
            Ok(session) => {
                if let Err(e) = store.set_token(&session.token) {
                    self.error = Some(e.to_string());
                    return None;
                }
                self.notice = None;
                tracing::info!(role = %role, "Signed in");
                Some(session.user)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    // ── Sign up ──────────────────────────────────────────

    /// Submit the sign-up form. Local validation runs first; a violation
    /// blocks submission with a specific message and no network call.
    /// On success the flow moves to OTP verification with the submitted
    /// email and a running expiry countdown.
    pub async fn submit_sign_up(&mut self, api: &impl PortalApi, form: &SignupForm) -> bool {
        let Some(role) = self.role else {
            self.error = Some("Select a role to continue".into());
            return false;
        };
        if self.busy.submitting {
            return false;
        }
        if let Err(message) = validate_signup(form) {
            self.error = Some(message);
            return false;
        }

        self.busy.submitting = true;
        self.error = None;
        let request = SignupRequest {
            national_id: form.national_id.trim().to_string(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            role,
        };
        let result = api.signup(&request).await;
        self.busy.submitting = false;

        match result {
            Ok(()) => {
                self.pending_email = Some(request.email);
                self.view = AuthView::OtpVerification;
                self.otp_input.clear();
                self.countdown.start(SIGNUP_OTP_WINDOW_SECS);
                self.notice = Some("We emailed you a 6-digit verification code.".into());
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    // ── OTP verification ─────────────────────────────────

    /// Submit the entered code. A non-6-digit code never triggers a call.
    /// On success the flow returns to the credential form in sign-in mode
    /// with a confirmation message; the issued token is deliberately not
    /// applied, so the user must sign in again.
    pub async fn submit_otp(&mut self, api: &impl PortalApi) -> bool {
        if !self.can_verify() {
            return false;
        }
        let Some(email) = self.pending_email.clone() else {
            return false;
        };

        self.busy.verifying = true;
        self.error = None;
        let result = api.verify_otp(&email, &self.otp_input).await;
        self.busy.verifying = false;

        match result {
            Ok(_session) => {
                self.view = AuthView::CredentialForm;
                self.mode = FormMode::SignIn;
                self.otp_input.clear();
                self.pending_email = None;
                self.countdown.reset();
                self.notice = Some("Account verified. Please sign in.".into());
                tracing::info!("Registration verified");
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Request a fresh code. Allowed only once the countdown reaches
    /// zero; on success the countdown restarts at the resend cooldown
    /// and any entered code is cleared.
    pub async fn resend_otp(&mut self, api: &impl PortalApi) -> bool {
        if !self.can_resend() {
            return false;
        }
        let Some(email) = self.pending_email.clone() else {
            return false;
        };

        self.busy.resending = true;
        self.error = None;
        let result = api.resend_otp(&email).await;
        self.busy.resending = false;

        match result {
            Ok(()) => {
                self.countdown.start(RESEND_COOLDOWN_SECS);
                self.otp_input.clear();
                self.notice = Some("A new verification code is on its way.".into());
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
