//! Treatment record PDF export.
//!
//! Pure layout: a treatment + its patient become a section list, then
//! `printpdf` renders the sections onto an A4 page. No network access,
//! no input mutation. The header carries a generated-at stamp from the
//! wall clock; the record's DATE line uses the treatment's own
//! timestamp.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use printpdf::*;

use crate::models::{PatientProfile, Treatment};

/// Errors from PDF export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF rendering error: {0}")]
    Render(String),
    #[error("Could not write export: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Layout ───────────────────────────────────────────────────────────────────

/// One titled block of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Assemble the printable sections for a treatment record.
///
/// Notes appear only when non-blank; the attachments section is omitted
/// entirely when the treatment has none.
pub fn build_sections(treatment: &Treatment, patient: &PatientProfile) -> Vec<Section> {
    let mut sections = Vec::new();

    sections.push(Section {
        heading: "PATIENT".into(),
        lines: vec![
            format!("Name: {}", patient.user.name),
            format!(
                "National ID: {}",
                patient.user.national_id.as_deref().unwrap_or("N/A")
            ),
            format!("Email: {}", patient.user.email),
        ],
    });

    sections.push(Section {
        heading: "TREATMENT".into(),
        lines: vec![
            format!("Date: {}", treatment.created_at.format("%Y-%m-%d %H:%M UTC")),
            format!("Doctor: {}", treatment.doctor_name),
            format!("Diagnosis: {}", treatment.diagnosis),
            format!("Medication: {}", treatment.medication),
        ],
    });

    if !treatment.notes.trim().is_empty() {
        sections.push(Section {
            heading: "NOTES".into(),
            lines: vec![treatment.notes.clone()],
        });
    }

    if !treatment.attachments.is_empty() {
        sections.push(Section {
            heading: "ATTACHMENTS".into(),
            lines: treatment
                .attachments
                .iter()
                .map(|f| format!("{} ({})", f.name, f.kind))
                .collect(),
        });
    }

    sections
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Render a treatment record to PDF bytes (A4, builtin fonts).
pub fn render_treatment_pdf(
    treatment: &Treatment,
    patient: &PatientProfile,
) -> Result<Vec<u8>, ExportError> {
    let title = format!("Treatment Record - {}", patient.user.name);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Render(format!("PDF font error: {e}")))?;

    let mut y = Mm(280.0);

    layer.use_text("MEDIPORT TREATMENT RECORD", 14.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M")),
        8.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    for section in build_sections(treatment, patient) {
        layer.use_text(format!("{}:", section.heading), 11.0, Mm(20.0), y, &bold);
        y -= Mm(6.0);
        for line in &section.lines {
            for wrapped in wrap_text(line, 90) {
                layer.use_text(&wrapped, 9.0, Mm(25.0), y, &font);
                y -= Mm(4.5);
            }
        }
        y -= Mm(4.0);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Render(format!("PDF buffer error: {e}")))
}

/// Default file name for an export.
pub fn export_file_name(treatment: &Treatment) -> String {
    format!(
        "treatment-{}-{}.pdf",
        treatment.id,
        treatment.created_at.format("%Y%m%d")
    )
}

/// Save rendered bytes into an exports directory, creating it as
/// needed. Returns the written path.
pub fn write_pdf(pdf_bytes: &[u8], file_name: &str, exports_dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(exports_dir)?;
    let path = exports_dir.join(file_name);
    std::fs::write(&path, pdf_bytes)?;
    Ok(path)
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedicalFile, Role, User};
    use chrono::{TimeZone, Utc};

    fn sample_patient() -> PatientProfile {
        PatientProfile {
            user: User {
                id: "p-1".into(),
                role: Role::Patient,
                name: "Ayesha Khan".into(),
                email: "ayesha@example.com".into(),
                national_id: Some("42101-1234567-1".into()),
                verified: Some(true),
            },
            history: vec!["Seasonal allergies".into()],
            treatments: Vec::new(),
        }
    }

    fn sample_treatment(attachments: Vec<MedicalFile>) -> Treatment {
        Treatment {
            id: "t-1".into(),
            patient_id: "p-1".into(),
            doctor_id: "d-1".into(),
            doctor_name: "Dr. Chen".into(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 20, 9, 30, 0).unwrap(),
            diagnosis: "Hypertension".into(),
            medication: "Lisinopril 10mg".into(),
            notes: "Recheck blood pressure in two weeks.".into(),
            attachments,
        }
    }

    fn attachment(name: &str, kind: &str) -> MedicalFile {
        MedicalFile {
            id: "f-1".into(),
            name: name.into(),
            kind: kind.into(),
            url: "data:application/pdf;base64,JVBERg==".into(),
            uploaded_at: Utc.with_ymd_and_hms(2026, 2, 20, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn sections_omit_attachments_when_there_are_none() {
        let sections = build_sections(&sample_treatment(vec![]), &sample_patient());
        assert!(sections.iter().all(|s| s.heading != "ATTACHMENTS"));
    }

    #[test]
    fn sections_list_each_attachment_name_and_kind() {
        let treatment = sample_treatment(vec![attachment("bp-chart.pdf", "PDF")]);
        let sections = build_sections(&treatment, &sample_patient());

        let attachments = sections
            .iter()
            .find(|s| s.heading == "ATTACHMENTS")
            .expect("attachments section present");
        assert_eq!(attachments.lines, vec!["bp-chart.pdf (PDF)".to_string()]);
    }

    #[test]
    fn date_line_uses_the_treatment_timestamp() {
        let sections = build_sections(&sample_treatment(vec![]), &sample_patient());
        let treatment_section = sections.iter().find(|s| s.heading == "TREATMENT").unwrap();
        assert_eq!(treatment_section.lines[0], "Date: 2026-02-20 09:30 UTC");
    }

    #[test]
    fn blank_notes_drop_the_notes_section() {
        let mut treatment = sample_treatment(vec![]);
        treatment.notes = "   ".into();
        let sections = build_sections(&treatment, &sample_patient());
        assert!(sections.iter().all(|s| s.heading != "NOTES"));
    }

    #[test]
    fn patient_without_national_id_renders_placeholder() {
        let mut patient = sample_patient();
        patient.user.national_id = None;
        let sections = build_sections(&sample_treatment(vec![]), &patient);
        assert_eq!(sections[0].lines[1], "National ID: N/A");
    }

    #[test]
    fn rendered_pdf_has_magic_bytes() {
        let bytes =
            render_treatment_pdf(&sample_treatment(vec![attachment("scan.pdf", "PDF")]), &sample_patient())
                .unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn write_pdf_creates_the_exports_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exports = dir.path().join("exports");

        let path = write_pdf(b"%PDF-1.4 test", "treatment-t-1.pdf", &exports).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");
        assert!(path.starts_with(&exports));
    }

    #[test]
    fn export_file_name_is_stable_for_a_record() {
        let name = export_file_name(&sample_treatment(vec![]));
        assert_eq!(name, "treatment-t-1-20260220.pdf");
    }

    #[test]
    fn wrap_text_splits_long_lines() {
        let text = "This is a long sentence that should be wrapped at around forty characters or so.";
        let lines = wrap_text(text, 40);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 45); // Allow some slack for word boundaries
        }
    }

    #[test]
    fn wrap_text_short_and_empty() {
        assert_eq!(wrap_text("Short", 40), vec!["Short".to_string()]);
        assert_eq!(wrap_text("", 40), vec![String::new()]);
    }
}
