//! Attachment intake — local files into self-contained data URLs.
//!
//! Each selected file is read and converted independently; the batch
//! joins before it is used, results in selection order. One failed
//! conversion fails the whole batch so a treatment is never submitted
//! with a partial attachment set.

use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

use crate::models::medical_file::{kind_label, MedicalFile};

/// Errors from attachment conversion.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Could not read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convert one local file into an attachment with an inline data URL.
pub async fn load_attachment(path: &Path) -> Result<MedicalFile, AttachmentError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|source| AttachmentError::Read {
        name: name.clone(),
        source,
    })?;

    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);

    Ok(MedicalFile {
        id: Uuid::new_v4().to_string(),
        kind: kind_label(&name),
        url: format!("data:{media_type};base64,{payload}"),
        name,
        uploaded_at: Utc::now(),
    })
}

/// Convert a batch of selected files.
///
/// Conversions run as independent tasks joined before the result is
/// returned; the output order is the selection order, not completion
/// order. Any single failure fails the batch.
pub async fn load_attachments(paths: &[PathBuf]) -> Result<Vec<MedicalFile>, AttachmentError> {
    futures_util::future::try_join_all(paths.iter().map(|path| load_attachment(path))).await
}
