//! Patient profile — a user plus their clinical record.

use serde::{Deserialize, Serialize};

use super::treatment::Treatment;
use super::user::User;

/// A user extended with their free-text history entries and treatment
/// timeline. Owned by the server; the client holds a cached copy per
/// session. Both collections default to empty when the server omits
/// them (e.g. a profile response for a doctor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
}

impl PatientProfile {
    /// Wrap a bare user with empty collections.
    pub fn from_user(user: User) -> Self {
        Self {
            user,
            history: Vec::new(),
            treatments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn embedded_collections_default_to_empty() {
        let profile: PatientProfile = serde_json::from_str(
            r#"{"id":"u-1","role":"patient","name":"Ayesha","email":"a@example.com"}"#,
        )
        .unwrap();
        assert_eq!(profile.user.role, Role::Patient);
        assert!(profile.history.is_empty());
        assert!(profile.treatments.is_empty());
    }

    #[test]
    fn user_fields_are_flattened_on_the_wire() {
        let profile: PatientProfile = serde_json::from_str(
            r#"{
                "id": "u-1",
                "role": "patient",
                "name": "Ayesha",
                "email": "a@example.com",
                "cnic": "35201-1234567-1",
                "history": ["Seasonal allergies"],
                "treatments": []
            }"#,
        )
        .unwrap();
        assert_eq!(profile.user.national_id.as_deref(), Some("35201-1234567-1"));
        assert_eq!(profile.history, vec!["Seasonal allergies".to_string()]);
    }
}
