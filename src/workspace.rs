//! Session-scoped record workspace.
//!
//! Owns the state a login derives: the current user, the doctor's
//! patient roster, the patient's own profile. Initialized per role by
//! the bootstrapper, torn down in one step by `sign_out`. Role gates
//! here are UI affordances only; the server independently authorizes
//! every call it receives.

use crate::api::error::ApiError;
use crate::api::types::{NewTreatment, PortalApi};
use crate::models::{PatientProfile, Role, Treatment, User};
use crate::session_store::{SessionStore, SessionStoreError};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Result of a roster lookup. Blank input and a genuine miss are
/// distinct outcomes so the UI can prompt differently.
#[derive(Debug)]
pub enum SearchOutcome<'a> {
    EmptyQuery,
    NotFound,
    Found(&'a PatientProfile),
}

/// Errors from workspace operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("{0}")]
    NotPermitted(&'static str),
    #[error("{0}")]
    Validation(&'static str),
    #[error("No patient with id {0} is loaded")]
    UnknownPatient(String),
    #[error("No treatment with id {0} is loaded")]
    UnknownTreatment(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

// ═══════════════════════════════════════════════════════════
// Workspace
// ═══════════════════════════════════════════════════════════

/// In-memory aggregate of session-derived record state.
#[derive(Debug)]
pub struct Workspace {
    user: User,
    /// Full roster; populated for doctors only.
    roster: Vec<PatientProfile>,
    /// The signed-in patient's own record; patients only.
    profile: Option<PatientProfile>,
}

impl Workspace {
    pub fn for_doctor(user: User, roster: Vec<PatientProfile>) -> Self {
        Self {
            user,
            roster,
            profile: None,
        }
    }

    pub fn for_patient(profile: PatientProfile) -> Self {
        Self {
            user: profile.user.clone(),
            roster: Vec::new(),
            profile: Some(profile),
        }
    }

    /// Workspace with no record data (guest, or a doctor whose roster
    /// could not be loaded).
    pub fn for_user(user: User) -> Self {
        Self {
            user,
            roster: Vec::new(),
            profile: None,
        }
    }

    // ── State access ─────────────────────────────────────

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn roster(&self) -> &[PatientProfile] {
        &self.roster
    }

    pub fn profile(&self) -> Option<&PatientProfile> {
        self.profile.as_ref()
    }

    // ── Patient lookup ───────────────────────────────────

    /// Look a patient up by national id, exact or hyphen-insensitive.
    /// Doctor surfaces only.
    pub fn search_patient(&self, query: &str) -> Result<SearchOutcome<'_>, WorkspaceError> {
        if self.role() != Role::Doctor {
            return Err(WorkspaceError::NotPermitted(
                "Patient search is available to doctors only",
            ));
        }
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::EmptyQuery);
        }

        let normalized = normalize_national_id(query);
        let hit = self.roster.iter().find(|p| {
            p.user
                .national_id
                .as_deref()
                .is_some_and(|id| id == query || normalize_national_id(id) == normalized)
        });

        Ok(match hit {
            Some(profile) => SearchOutcome::Found(profile),
            None => SearchOutcome::NotFound,
        })
    }

    // ── Treatment creation (doctor surface) ──────────────

    /// Record a treatment for a rostered patient. Diagnosis and
    /// medication are required before any network call; the created
    /// record joins the patient's timeline only after the server
    /// acknowledged it.
    pub async fn add_treatment(
        &mut self,
        api: &impl PortalApi,
        draft: NewTreatment,
    ) -> Result<&Treatment, WorkspaceError> {
        if self.role() != Role::Doctor {
            return Err(WorkspaceError::NotPermitted(
                "Only doctors can record treatments",
            ));
        }
        if draft.diagnosis.trim().is_empty() {
            return Err(WorkspaceError::Validation("Diagnosis is required"));
        }
        if draft.medication.trim().is_empty() {
            return Err(WorkspaceError::Validation("Medication is required"));
        }
        let position = self
            .roster
            .iter()
            .position(|p| p.user.id == draft.patient_id)
            .ok_or_else(|| WorkspaceError::UnknownPatient(draft.patient_id.clone()))?;

        let created = api.add_treatment(&draft).await?;
        tracing::info!(treatment = %created.id, patient = %created.patient_id, "Treatment recorded");

        let patient = &mut self.roster[position];
        patient.treatments.insert(0, created);
        Ok(&patient.treatments[0])
    }

    // ── Treatment deletion (patient surface) ─────────────

    /// Remove a record from the signed-in patient's own timeline. The
    /// local copy is dropped only after the server acknowledged the
    /// deletion.
    pub async fn delete_treatment(
        &mut self,
        api: &impl PortalApi,
        treatment_id: &str,
    ) -> Result<(), WorkspaceError> {
        if self.role() != Role::Patient {
            return Err(WorkspaceError::NotPermitted(
                "Only the patient can remove records from this view",
            ));
        }
        let owns_it = self
            .profile
            .as_ref()
            .is_some_and(|p| p.treatments.iter().any(|t| t.id == treatment_id));
        if !owns_it {
            return Err(WorkspaceError::UnknownTreatment(treatment_id.to_string()));
        }

        api.delete_treatment(treatment_id).await?;

        if let Some(profile) = self.profile.as_mut() {
            remove_treatment(std::slice::from_mut(profile), treatment_id);
        }
        tracing::info!(treatment = %treatment_id, "Treatment removed");
        Ok(())
    }

    // ── Teardown ─────────────────────────────────────────

    /// Clear the persisted token and drop all session-derived state.
    pub fn sign_out(self, store: &SessionStore) -> Result<(), WorkspaceError> {
        store.clear()?;
        tracing::info!("Signed out; session state cleared");
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════

/// Hyphen- and whitespace-insensitive national-id comparison key.
pub fn normalize_national_id(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Remove one treatment id from the profile that owns it, leaving every
/// other profile untouched. Returns `true` when a record was removed.
fn remove_treatment(profiles: &mut [PatientProfile], treatment_id: &str) -> bool {
    for profile in profiles.iter_mut() {
        if let Some(position) = profile.treatments.iter().position(|t| t.id == treatment_id) {
            profile.treatments.remove(position);
            return true;
        }
    }
    false
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
