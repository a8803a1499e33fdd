use axum::extract::{Path, State};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::lifecycle::export_input;
use crate::state::AppState;

use super::{export_json, export_pdf, export_text, ExportArtifact};

/// GET /api/v1/sessions/:id/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ExportArtifact, AppError> {
    let input = export_input(&state, id).await?;
    Ok(export_pdf(input, state.page_config.clone()).await?)
}

/// GET /api/v1/sessions/:id/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ExportArtifact, AppError> {
    let input = export_input(&state, id).await?;
    Ok(export_json(input).await?)
}

/// GET /api/v1/sessions/:id/export/text
pub async fn handle_export_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ExportArtifact, AppError> {
    let input = export_input(&state, id).await?;
    Ok(export_text(input).await?)
}
