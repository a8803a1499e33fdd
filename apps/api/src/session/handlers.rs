use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::bridge::photo::accept_photo;
use crate::errors::AppError;
use crate::models::document::SectionKind;
use crate::state::AppState;

use super::lifecycle::{self, mutate, Mutation};
use super::{Notice, SessionResponse};

fn respond<R>(mutation: Mutation<R>, updated_fields: Vec<String>) -> Json<SessionResponse> {
    Json(SessionResponse {
        session: mutation.session,
        notices: mutation.notices,
        updated_fields,
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (session, notices) = lifecycle::create_session(&state).await;
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session,
            notices,
            updated_fields: Vec::new(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let (session, notices) = lifecycle::open_session(&state, id).await?;
    Ok(Json(SessionResponse {
        session,
        notices,
        updated_fields: Vec::new(),
    }))
}

#[derive(Deserialize)]
pub struct FieldEditRequest {
    /// Dotted record path, e.g. `personalInfo.fullName` or `experiences.0.title`.
    pub path: String,
    pub value: String,
}

/// PATCH /api/v1/sessions/:id/fields
pub async fn handle_field_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldEditRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let path = req.path.clone();
    let mutation = mutate(&state, id, |s| s.apply_field_edit(&req.path, &req.value)).await?;
    Ok(respond(mutation, vec![path]))
}

#[derive(Deserialize)]
pub struct MarkupRequest {
    pub markup: String,
}

/// PUT /api/v1/sessions/:id/header
pub async fn handle_header_change(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MarkupRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mutation = mutate(&state, id, |s| s.sync_header(&req.markup)).await?;
    let fields = mutation.value.iter().map(|f| f.path().to_string()).collect();
    Ok(respond(mutation, fields))
}

/// POST /api/v1/sessions/:id/photo
///
/// Expects a multipart form with a `photo` file part.
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        upload = Some((content_type, bytes));
        break;
    }

    let (content_type, bytes) = upload
        .ok_or_else(|| AppError::Validation("Multipart field 'photo' is required".to_string()))?;
    let data_uri = accept_photo(&content_type, &bytes)?;
    info!(session_id = %id, bytes = bytes.len(), content_type = %content_type, "Photo accepted");

    let mut mutation = mutate(&state, id, |s| {
        s.set_photo(Some(data_uri));
        Ok(())
    })
    .await?;
    mutation.notices.push(Notice::success("Photo added successfully"));
    Ok(respond(mutation, vec!["personalInfo.photo".to_string()]))
}

/// DELETE /api/v1/sessions/:id/photo
pub async fn handle_remove_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut mutation = mutate(&state, id, |s| {
        s.set_photo(None);
        Ok(())
    })
    .await?;
    mutation.notices.push(Notice::success("Photo removed"));
    Ok(respond(mutation, vec!["personalInfo.photo".to_string()]))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRequest {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
}

/// PUT /api/v1/sessions/:id/style
pub async fn handle_set_style(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StyleRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mutation = mutate(&state, id, |s| {
        s.set_style(req.font_family, req.font_size);
        Ok(())
    })
    .await?;
    Ok(respond(mutation, Vec::new()))
}

#[derive(Deserialize)]
pub struct AddSectionRequest {
    pub kind: SectionKind,
}

/// POST /api/v1/sessions/:id/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddSectionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let mut mutation = mutate(&state, id, |s| s.add_section(req.kind).map(|section| section.id)).await?;
    mutation
        .notices
        .push(Notice::success(format!("Section {} added", req.kind.as_str())));
    Ok((StatusCode::CREATED, respond(mutation, Vec::new())))
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<Uuid>,
}

/// PUT /api/v1/sessions/:id/sections/order
pub async fn handle_reorder_sections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mutation = mutate(&state, id, |s| s.reorder_sections(&req.order)).await?;
    Ok(respond(mutation, Vec::new()))
}

/// PUT /api/v1/sessions/:id/sections/:section_id
pub async fn handle_update_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<MarkupRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mutation = mutate(&state, id, |s| s.update_section(section_id, &req.markup)).await?;
    let fields = mutation.value.iter().map(|f| f.path().to_string()).collect();
    Ok(respond(mutation, fields))
}

/// DELETE /api/v1/sessions/:id/sections/:section_id
pub async fn handle_remove_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionResponse>, AppError> {
    let mutation = mutate(&state, id, |s| s.remove_section(section_id).map(|_| ())).await?;
    Ok(respond(mutation, Vec::new()))
}

/// POST /api/v1/sessions/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let (session, notices) = lifecycle::save_session(&state, id).await?;
    Ok(Json(SessionResponse {
        session,
        notices,
        updated_fields: Vec::new(),
    }))
}

#[derive(Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/v1/sessions/:id/reset
///
/// Destructive: requires `{"confirm": true}`.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if !req.confirm {
        return Err(AppError::Validation(
            "Reset must be confirmed with \"confirm\": true".to_string(),
        ));
    }
    let (session, notices) = lifecycle::reset_session(&state, id).await?;
    Ok(Json(SessionResponse {
        session,
        notices,
        updated_fields: Vec::new(),
    }))
}
