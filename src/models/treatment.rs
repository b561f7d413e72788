//! Treatment records — one clinical encounter each.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::medical_file::MedicalFile;

/// A single clinical encounter authored by a doctor for a patient.
/// Immutable once created; only deleted as a whole, never partially
/// edited by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub created_at: DateTime<Utc>,
    pub diagnosis: String,
    pub medication: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attachments: Vec<MedicalFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_notes_or_attachments() {
        let treatment: Treatment = serde_json::from_str(
            r#"{
                "id": "t-1",
                "patient_id": "p-1",
                "doctor_id": "d-1",
                "doctor_name": "Dr. Chen",
                "created_at": "2026-02-20T09:30:00Z",
                "diagnosis": "Type 2 diabetes",
                "medication": "Metformin 500mg"
            }"#,
        )
        .unwrap();
        assert!(treatment.notes.is_empty());
        assert!(treatment.attachments.is_empty());
    }
}
