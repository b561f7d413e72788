//! Attached clinical document metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file attached to a treatment. Created client-side during attachment
/// selection (inline data URL) or returned by the server (remote URL).
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalFile {
    pub id: String,
    /// Original file name as selected by the user.
    pub name: String,
    /// Display label derived from the extension, e.g. "PDF", "JPG".
    pub kind: String,
    /// Self-contained `data:` URL for new uploads, server URL otherwise.
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Derive the display label for a file name: uppercased extension,
/// "FILE" when there is none.
pub fn kind_label(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_uppercase())
        .unwrap_or_else(|| "FILE".to_string())
}
