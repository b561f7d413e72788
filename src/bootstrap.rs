//! Startup session restoration.
//!
//! A persisted token is exchanged for a profile and role-appropriate
//! data. A rejected token is discarded silently: the application falls
//! back to the unauthenticated view without ever surfacing an error.

use crate::api::error::ApiError;
use crate::api::types::PortalApi;
use crate::models::{Role, User};
use crate::session_store::SessionStore;
use crate::workspace::Workspace;

/// Outcome of startup restoration.
pub enum Bootstrap {
    /// No usable session; show the unauthenticated view.
    NoSession,
    /// Session restored with role-appropriate data preloaded.
    Session(Workspace),
}

/// Restore a session from the persisted token, if any.
///
/// No token resolves to `NoSession` immediately. A token the server
/// rejects is removed from storage and also resolves to `NoSession`;
/// this path is deliberately silent. For doctors, a roster fetch
/// failure after a valid profile degrades to an empty roster rather
/// than discarding the session.
pub async fn restore_session(api: &impl PortalApi, store: &SessionStore) -> Bootstrap {
    if !store.is_authenticated() {
        return Bootstrap::NoSession;
    }

    match api.get_profile().await {
        Ok(profile) => {
            tracing::info!(role = %profile.user.role, "Session restored");
            let workspace = match profile.user.role {
                Role::Doctor => {
                    let roster = match api.get_patients().await {
                        Ok(roster) => roster,
                        Err(e) => {
                            tracing::warn!("Patient roster unavailable at startup: {e}");
                            Vec::new()
                        }
                    };
                    Workspace::for_doctor(profile.user, roster)
                }
                Role::Patient => Workspace::for_patient(profile),
                Role::Guest => Workspace::for_user(profile.user),
            };
            Bootstrap::Session(workspace)
        }
        Err(e) => {
            tracing::debug!("Stored session rejected, clearing token: {e}");
            if let Err(e) = store.clear() {
                tracing::warn!("Failed to clear stale token: {e}");
            }
            Bootstrap::NoSession
        }
    }
}

/// Role-appropriate data load after a fresh interactive login. Unlike
/// `restore_session`, failures here are surfaced to the caller.
pub async fn load_workspace(api: &impl PortalApi, user: User) -> Result<Workspace, ApiError> {
    match user.role {
        Role::Doctor => {
            let roster = api.get_patients().await?;
            Ok(Workspace::for_doctor(user, roster))
        }
        Role::Patient => {
            let profile = api.get_profile().await?;
            Ok(Workspace::for_patient(profile))
        }
        Role::Guest => Ok(Workspace::for_user(user)),
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::models::PatientProfile;

    fn user(role: Role) -> User {
        User {
            id: "u-1".into(),
            role,
            name: "Ayesha Khan".into(),
            email: "ayesha@example.com".into(),
            national_id: Some("42101-1234567-1".into()),
            verified: Some(true),
        }
    }

    fn profile(role: Role) -> PatientProfile {
        PatientProfile {
            user: user(role),
            history: vec!["Seasonal allergies".into()],
            treatments: Vec::new(),
        }
    }

    fn temp_store_with_token() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.token"));
        store.set_token("tok-1").unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn no_token_resolves_immediately_without_calls() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.token"));
        let api = MockApi::new();

        let outcome = restore_session(&api, &store).await;

        assert!(matches!(outcome, Bootstrap::NoSession));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_cleared_silently() {
        let (_dir, store) = temp_store_with_token();
        let api = MockApi::new().with_profile(Err("Token expired".into()));

        let outcome = restore_session(&api, &store).await;

        assert!(matches!(outcome, Bootstrap::NoSession));
        assert!(!store.is_authenticated(), "Stale token removed from storage");
    }

    #[tokio::test]
    async fn patient_session_restores_embedded_record() {
        let (_dir, store) = temp_store_with_token();
        let api = MockApi::new().with_profile(Ok(profile(Role::Patient)));

        let outcome = restore_session(&api, &store).await;

        let Bootstrap::Session(ws) = outcome else {
            panic!("Expected a restored session");
        };
        assert_eq!(ws.role(), Role::Patient);
        assert_eq!(ws.profile().unwrap().history.len(), 1);
        assert_eq!(api.call_count("get_patients"), 0, "No roster for patients");
    }

    #[tokio::test]
    async fn doctor_session_preloads_the_roster() {
        let (_dir, store) = temp_store_with_token();
        let api = MockApi::new()
            .with_profile(Ok(profile(Role::Doctor)))
            .with_patients(Ok(vec![profile(Role::Patient)]));

        let outcome = restore_session(&api, &store).await;

        let Bootstrap::Session(ws) = outcome else {
            panic!("Expected a restored session");
        };
        assert_eq!(ws.role(), Role::Doctor);
        assert_eq!(ws.roster().len(), 1);
    }

    #[tokio::test]
    async fn roster_failure_degrades_to_empty_not_logout() {
        let (_dir, store) = temp_store_with_token();
        let api = MockApi::new()
            .with_profile(Ok(profile(Role::Doctor)))
            .with_patients(Err("Temporarily unavailable".into()));

        let outcome = restore_session(&api, &store).await;

        let Bootstrap::Session(ws) = outcome else {
            panic!("Expected the session to survive");
        };
        assert!(ws.roster().is_empty());
        assert!(store.is_authenticated(), "Token kept; the profile call succeeded");
    }

    #[tokio::test]
    async fn guest_session_restores_bare_workspace() {
        let (_dir, store) = temp_store_with_token();
        let api = MockApi::new().with_profile(Ok(profile(Role::Guest)));

        let outcome = restore_session(&api, &store).await;

        let Bootstrap::Session(ws) = outcome else {
            panic!("Expected a restored session");
        };
        assert_eq!(ws.role(), Role::Guest);
        assert!(ws.roster().is_empty());
        assert!(ws.profile().is_none());
    }

    #[tokio::test]
    async fn fresh_login_load_surfaces_failures() {
        let api = MockApi::new().with_profile(Err("Token expired".into()));

        let err = load_workspace(&api, user(Role::Patient)).await.unwrap_err();
        assert_eq!(err.to_string(), "Token expired");
    }

    #[tokio::test]
    async fn fresh_login_load_for_doctor_fetches_roster() {
        let api = MockApi::new().with_patients(Ok(vec![profile(Role::Patient)]));

        let ws = load_workspace(&api, user(Role::Doctor)).await.unwrap();
        assert_eq!(ws.roster().len(), 1);
        assert_eq!(api.call_count("get_profile"), 0);
    }
}
