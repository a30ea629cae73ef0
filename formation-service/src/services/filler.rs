use crate::docx::Document;
use crate::dtos::{Learner, TrainingReport};
use chrono::Local;
use service_core::error::AppError;
use std::path::{Path, PathBuf};

/// Rows 1..=9 of the learner table hold data; row 0 is the header.
pub const MAX_LEARNERS: usize = 9;

const GENERAL_TABLE: usize = 0;
const THEMES_TABLE: usize = 2;
const LEARNERS_TABLE: usize = 3;

pub struct FilledDocument {
    pub path: PathBuf,
    pub filename: String,
}

/// Fills the fixed-layout template with `record` and writes the result into
/// the OS temp directory under the derived filename. Absent fields leave the
/// template's cell text as-is; `date_redaction` falls back to today's date.
pub fn fill_report(
    record: &TrainingReport,
    template_path: &Path,
) -> Result<FilledDocument, AppError> {
    let mut document = Document::open(template_path).map_err(|e| {
        tracing::error!(path = %template_path.display(), error = %e, "Failed to open template");
        AppError::TemplateOpen(anyhow::Error::new(e))
    })?;

    // General metadata table, column 1 holds the value cells. The
    // assignment appears twice, on rows 0 and 1.
    if let Some(value) = &record.affectation {
        write_cell(&mut document, GENERAL_TABLE, 0, 1, value)?;
        write_cell(&mut document, GENERAL_TABLE, 1, 1, value)?;
    }
    if let Some(value) = &record.semaine {
        write_cell(&mut document, GENERAL_TABLE, 2, 1, value)?;
    }
    if let Some(value) = &record.formateur {
        write_cell(&mut document, GENERAL_TABLE, 3, 1, value)?;
    }
    if let Some(value) = &record.referent {
        write_cell(&mut document, GENERAL_TABLE, 4, 1, value)?;
    }
    if let Some(value) = &record.horaires {
        write_cell(&mut document, GENERAL_TABLE, 5, 1, value)?;
    }
    if let Some(value) = &record.numero_action {
        write_cell(&mut document, GENERAL_TABLE, 6, 1, value)?;
    }
    match &record.date_redaction {
        Some(value) => write_cell(&mut document, GENERAL_TABLE, 7, 1, value)?,
        None => {
            let today = Local::now().format("%d/%m/%Y").to_string();
            write_cell(&mut document, GENERAL_TABLE, 7, 1, &today)?;
        }
    }
    if let Some(value) = &record.observations_groupe {
        write_cell(&mut document, GENERAL_TABLE, 8, 1, value)?;
    }

    if let Some(value) = &record.themes_modules {
        write_cell(&mut document, THEMES_TABLE, 0, 1, value)?;
    }
    if let Some(value) = &record.previsions {
        write_cell(&mut document, THEMES_TABLE, 1, 1, value)?;
    }

    if let Some(apprenants) = &record.apprenants {
        // Entries beyond the table capacity are dropped silently.
        for (index, learner) in apprenants.iter().take(MAX_LEARNERS).enumerate() {
            write_learner(&mut document, index + 1, learner)?;
        }
    }

    let filename = output_filename(record);
    let path = std::env::temp_dir().join(&filename);
    document.save(&path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to save filled document");
        AppError::DocumentSave(anyhow::Error::new(e))
    })?;

    tracing::info!(
        template = %template_path.display(),
        filename = %filename,
        "Filled training report"
    );

    Ok(FilledDocument { path, filename })
}

fn write_learner(document: &mut Document, row: usize, learner: &Learner) -> Result<(), AppError> {
    if let Some(nom) = &learner.nom {
        write_cell(document, LEARNERS_TABLE, row, 0, nom)?;
    }
    if let Some(prenom) = &learner.prenom {
        write_cell(document, LEARNERS_TABLE, row, 1, prenom)?;
    }
    if let Some(observation) = &learner.observation {
        write_cell(document, LEARNERS_TABLE, row, 2, observation)?;
    }
    Ok(())
}

fn write_cell(
    document: &mut Document,
    table: usize,
    row: usize,
    col: usize,
    text: &str,
) -> Result<(), AppError> {
    document
        .set_cell_text(table, row, col, text)
        .map_err(|e| AppError::CellIndex(anyhow::Error::new(e)))
}

/// Derives the download filename from the assignment and week fields. The
/// transforms are ordered: the week's "Du " prefix goes first, then the
/// " au " separator, then slashes, then spaces.
pub fn output_filename(record: &TrainingReport) -> String {
    let affectation = record
        .affectation
        .as_deref()
        .unwrap_or("FORMATION")
        .replace('/', "-")
        .replace(' ', "_");

    let semaine = record.semaine.as_deref().unwrap_or("");
    let semaine = semaine
        .strip_prefix("Du ")
        .unwrap_or(semaine)
        .replace(" au ", "_au_")
        .replace('/', "-")
        .replace(' ', "_");
    let semaine = semaine.trim();

    format!("SUIVI_FORMATION_{}_{}.docx", affectation, semaine)
}
