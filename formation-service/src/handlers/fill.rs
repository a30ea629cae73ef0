use crate::dtos::{Learner, TrainingReport};
use crate::services::{fill_report, FilledDocument};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde_json::Value;
use service_core::error::AppError;
use std::path::Path;

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub async fn fill_document(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    if body.is_empty() {
        return Err(AppError::MissingBody);
    }

    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidPayload(anyhow::Error::new(e)))?;
    if is_empty_payload(&value) {
        return Err(AppError::MissingBody);
    }

    let record: TrainingReport = serde_json::from_value(value)
        .map_err(|e| AppError::InvalidPayload(anyhow::Error::new(e)))?;

    let filled = fill_report(&record, Path::new(&state.config.template.path))?;
    serve_document(filled).await
}

pub async fn test_fill(State(state): State<AppState>) -> Result<Response, AppError> {
    let record = sample_report();
    let filled = fill_report(&record, Path::new(&state.config.template.path))?;
    serve_document(filled).await
}

async fn serve_document(filled: FilledDocument) -> Result<Response, AppError> {
    let data = tokio::fs::read(&filled.path).await.map_err(|e| {
        tracing::error!(
            path = %filled.path.display(),
            error = %e,
            "Failed to read generated document"
        );
        AppError::from(e)
    })?;

    tracing::info!(
        filename = %filled.filename,
        size = data.len(),
        "Serving filled document"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filled.filename),
            ),
        ],
        data,
    )
        .into_response())
}

/// A body that decodes to JSON null, false, zero, an empty string, or an
/// empty container counts as "no data provided".
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Canned report used by the `/test-fill` route.
fn sample_report() -> TrainingReport {
    TrainingReport {
        affectation: Some("CAP 2 OLBER - TEST".to_string()),
        semaine: Some("Du 24/03/2025 au 26/03/2025".to_string()),
        formateur: Some("Yves Sournac".to_string()),
        referent: Some("Jean-François SOLLEAU".to_string()),
        horaires: Some("8h-12h / 13h-17h".to_string()),
        numero_action: Some("25SF1353".to_string()),
        date_redaction: Some(Local::now().format("%d/%m/%Y").to_string()),
        observations_groupe: Some("Groupe test - Automatisation réussie !".to_string()),
        themes_modules: Some(
            "CP1 - Réception de marchandises\nContrôle quantitatif et qualitatif\nUtilisation du scan"
                .to_string(),
        ),
        previsions: Some("CP2 - Stockage et rangement en zone dédiée".to_string()),
        apprenants: Some(vec![
            Learner {
                nom: Some("DUPONT".to_string()),
                prenom: Some("Jean".to_string()),
                observation: Some("Très investi, bonne compréhension des concepts".to_string()),
            },
            Learner {
                nom: Some("MARTIN".to_string()),
                prenom: Some("Sophie".to_string()),
                observation: Some("Quelques difficultés sur le scan, à accompagner".to_string()),
            },
            Learner {
                nom: Some("BERNARD".to_string()),
                prenom: Some("Lucas".to_string()),
                observation: Some("Absent cette semaine".to_string()),
            },
        ]),
    }
}
