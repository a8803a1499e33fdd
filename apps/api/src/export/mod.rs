//! Document exporter: PDF, JSON and plain text.
//!
//! Every export works on an [`ExportInput`] cloned from the session before
//! any work starts, so edits made while an export runs never leak into it. Each
//! invocation is tracked by its own [`ExportRun`].

pub mod extract;
pub mod handlers;
pub mod json;
pub mod pdf;
pub mod phase;
pub mod text;

use std::sync::Arc;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::Local;
use thiserror::Error;
use uuid::Uuid;

use crate::models::document::RenderedDocument;
use crate::models::record::ResumeRecord;

pub use phase::{ExportFormat, ExportPhase, ExportRun};

use self::extract::extract_sections;
use self::pdf::{encode_pdf, layout_resume, PageConfig};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O failure while writing export: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("Export cannot move from {from:?} to {to:?}")]
    Phase { from: ExportPhase, to: ExportPhase },
}

/// Immutable copy of the state an export reads.
#[derive(Debug, Clone)]
pub struct ExportInput {
    pub session_id: Uuid,
    pub record: ResumeRecord,
    pub document: RenderedDocument,
}

/// A finished export, served as a download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ExportArtifact {
    fn new(format: ExportFormat, bytes: impl Into<Bytes>) -> Self {
        ExportArtifact {
            format,
            bytes: bytes.into(),
        }
    }
}

impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.format.filename());
        (
            [
                (header::CONTENT_TYPE, self.format.mime().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Closes the run as `Done` or `Failed` depending on `result`.
fn finish(
    mut run: ExportRun,
    result: Result<ExportArtifact, ExportError>,
) -> Result<ExportArtifact, ExportError> {
    match result.and_then(|artifact| run.advance(ExportPhase::Done).map(|_| artifact)) {
        Ok(artifact) => Ok(artifact),
        Err(e) => {
            run.fail(&e);
            Err(e)
        }
    }
}

fn join_error(stage: &str, e: tokio::task::JoinError) -> ExportError {
    ExportError::Task(format!("{stage} task failed: {e}"))
}

pub async fn export_pdf(
    input: ExportInput,
    config: Arc<PageConfig>,
) -> Result<ExportArtifact, ExportError> {
    let mut run = ExportRun::new(input.session_id, ExportFormat::Pdf);
    let result = run_pdf(&mut run, input, config).await;
    finish(run, result)
}

async fn run_pdf(
    run: &mut ExportRun,
    input: ExportInput,
    config: Arc<PageConfig>,
) -> Result<ExportArtifact, ExportError> {
    run.advance(ExportPhase::Extracting)?;
    let sections = extract_sections(&input.document);
    let info = input.record.personal_info;

    run.advance(ExportPhase::LayingOut)?;
    let generated_on = Local::now().date_naive();
    let cfg = config.clone();
    let layout = tokio::task::spawn_blocking(move || {
        layout_resume(&info, &sections, generated_on, &cfg)
    })
    .await
    .map_err(|e| join_error("layout", e))?;

    run.advance(ExportPhase::Encoding)?;
    let bytes = tokio::task::spawn_blocking(move || encode_pdf(&layout, &config))
        .await
        .map_err(|e| join_error("encode", e))??;

    Ok(ExportArtifact::new(run.format(), bytes))
}

pub async fn export_json(input: ExportInput) -> Result<ExportArtifact, ExportError> {
    let mut run = ExportRun::new(input.session_id, ExportFormat::Json);
    let result = run_json(&mut run, &input.record);
    finish(run, result)
}

fn run_json(run: &mut ExportRun, record: &ResumeRecord) -> Result<ExportArtifact, ExportError> {
    run.advance(ExportPhase::Extracting)?;
    run.advance(ExportPhase::Encoding)?;
    let bytes = json::render_json(record)?;
    Ok(ExportArtifact::new(run.format(), bytes))
}

pub async fn export_text(input: ExportInput) -> Result<ExportArtifact, ExportError> {
    let mut run = ExportRun::new(input.session_id, ExportFormat::Text);
    let result = run_text(&mut run, &input.record);
    finish(run, result)
}

fn run_text(run: &mut ExportRun, record: &ResumeRecord) -> Result<ExportArtifact, ExportError> {
    run.advance(ExportPhase::Extracting)?;
    run.advance(ExportPhase::Encoding)?;
    Ok(ExportArtifact::new(run.format(), text::render_text(record)))
}
