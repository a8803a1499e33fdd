pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::bridge::photo::MAX_PHOTO_BYTES;
use crate::export::handlers as export;
use crate::session::handlers as session;
use crate::state::AppState;

/// Multipart uploads carry framing on top of the image, and oversized images
/// must reach validation to get the size message.
const PHOTO_BODY_LIMIT: usize = MAX_PHOTO_BYTES + 3 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/:id", get(session::handle_get_session))
        .route(
            "/api/v1/sessions/:id/fields",
            axum::routing::patch(session::handle_field_edit),
        )
        .route(
            "/api/v1/sessions/:id/header",
            put(session::handle_header_change),
        )
        .route(
            "/api/v1/sessions/:id/photo",
            post(session::handle_upload_photo)
                .delete(session::handle_remove_photo)
                .layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .route("/api/v1/sessions/:id/style", put(session::handle_set_style))
        .route(
            "/api/v1/sessions/:id/sections",
            post(session::handle_add_section),
        )
        .route(
            "/api/v1/sessions/:id/sections/order",
            put(session::handle_reorder_sections),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section_id",
            put(session::handle_update_section).delete(session::handle_remove_section),
        )
        .route("/api/v1/sessions/:id/save", post(session::handle_save))
        .route("/api/v1/sessions/:id/reset", post(session::handle_reset))
        // Exports
        .route(
            "/api/v1/sessions/:id/export/pdf",
            get(export::handle_export_pdf),
        )
        .route(
            "/api/v1/sessions/:id/export/json",
            get(export::handle_export_json),
        )
        .route(
            "/api/v1/sessions/:id/export/text",
            get(export::handle_export_text),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::MemorySnapshotStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(
            Config::local_defaults(),
            Arc::new(MemorySnapshotStore::default()),
        );
        build_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router) -> String {
        let response = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["session"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn multipart_photo(content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "X-ELEGANCE-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    async fn upload(app: &Router, id: &str, content_type: &str, bytes: &[u8]) -> Response {
        let (header_value, body) = multipart_photo(content_type, bytes);
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/sessions/{id}/photo"))
            .header(header::CONTENT_TYPE, header_value)
            .body(Body::from(body))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["openSessions"], 0);
    }

    #[tokio::test]
    async fn test_field_edit_updates_header() {
        let app = app();
        let id = create(&app).await;

        let response = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/fields"),
            Some(json!({ "path": "personalInfo.fullName", "value": "Ada Lovelace" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["session"]["record"]["personalInfo"]["fullName"], "Ada Lovelace");
        assert!(body["session"]["document"]["sections"][0]["markup"]
            .as_str()
            .unwrap()
            .contains("<h1>Ada Lovelace</h1>"));
        assert_eq!(body["updatedFields"], json!(["personalInfo.fullName"]));
    }

    #[tokio::test]
    async fn test_bad_field_path_is_400() {
        let app = app();
        let id = create(&app).await;
        let response = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/fields"),
            Some(json!({ "path": "experiences.5.title", "value": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_header_change_reports_updated_fields() {
        let app = app();
        let id = create(&app).await;
        let response = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/header"),
            Some(json!({ "markup": "<h1>Ada</h1><p>Phone +44 1234</p>" })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(
            body["updatedFields"],
            json!(["personalInfo.fullName", "personalInfo.phone"])
        );
        assert_eq!(body["session"]["record"]["personalInfo"]["phone"], "+44 1234");
    }

    #[tokio::test]
    async fn test_photo_upload_limits() {
        let app = app();
        let id = create(&app).await;

        let too_big = vec![0u8; 6 * 1024 * 1024];
        let response = upload(&app, &id, "image/png", &too_big).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Image must not exceed 5MB"
        );

        let response = upload(&app, &id, "text/plain", b"hello").await;
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please select a valid image"
        );

        let ok = vec![1u8; 2 * 1024 * 1024];
        let response = upload(&app, &id, "image/png", &ok).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["notices"][0]["message"], "Photo added successfully");
        assert!(body["session"]["record"]["personalInfo"]["photo"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));

        let response = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/sessions/{id}/photo"),
            None,
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["notices"][0]["message"], "Photo removed");
        assert_eq!(body["session"]["record"]["personalInfo"]["photo"], Value::Null);
    }

    #[tokio::test]
    async fn test_sections_add_reorder_delete() {
        let app = app();
        let id = create(&app).await;

        let response = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/sections"),
            Some(json!({ "kind": "skills" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["notices"][0]["message"], "Section skills added");
        let sections = body["session"]["document"]["sections"].as_array().unwrap();
        let header_id = sections[0]["id"].as_str().unwrap().to_string();
        let skills_id = sections[1]["id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/sections/order"),
            Some(json!({ "order": [skills_id, header_id] })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["session"]["document"]["sections"][0]["kind"], "skills");

        let response = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/sessions/{id}/sections/{skills_id}"),
            None,
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(
            body["session"]["document"]["sections"].as_array().unwrap().len(),
            1
        );

        let response = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/sections"),
            Some(json!({ "kind": "header" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let app = app();
        let id = create(&app).await;
        let uri = format!("/api/v1/sessions/{id}/reset");

        let response = send(&app, Method::POST, &uri, Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::POST, &uri, Some(json!({ "confirm": true }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["notices"][0]["message"],
            "Resume reset successfully"
        );
    }

    #[tokio::test]
    async fn test_exports() {
        let app = app();
        let id = create(&app).await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/fields"),
            Some(json!({ "path": "skills.0", "value": "C++" })),
        )
        .await;

        let response = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/export/pdf"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let response = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/export/json"), None).await;
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume-data.json\""
        );
        assert_eq!(json_body(response).await["skills"], json!(["C++"]));

        let response = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/export/text"), None).await;
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("SKILLS\n- C++\n"));
    }

    #[tokio::test]
    async fn test_unknown_session_opens_empty() {
        let app = app();
        let id = uuid::Uuid::new_v4();
        let response = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["session"]["record"]["personalInfo"]["fullName"], "");
    }
}
