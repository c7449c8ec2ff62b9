use super::{
    dto::{AttachmentDto, InspectionViewDto},
    form::InspectionSubmission,
    repository,
    service::{self, SubmitInspectionError},
};
use crate::{
    database::error::DbError,
    modules::{
        auth::{self, middleware::RequestUser},
        common::{
            error_codes::INSPECTION_SIGNED,
            extractors::{DbConnection, ValidatedMultipart},
            multipart_form_data::{self, EVIDENCE_EXTENSIONS},
            responses::{internal_error_msg, InspectionRejection, SimpleError},
        },
        diagnostic,
    },
    server::controller::AppState,
    services::s3::S3Key,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use http::StatusCode;
use shared::entity::{self, suspension_attachment};

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:session_id", get(inspection).post(submit_inspection))
        .route("/:session_id/attachment", post(add_attachment))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            auth::middleware::require_user,
        ))
}

/// Get the suspension inspection of a diagnostic session
///
/// a draft inspection is created on the first visit with the request user as the inspector
#[utoipa::path(
    get,
    tag = "suspension",
    path = "/suspension/{session_id}",
    security(("session_id" = [])),
    params(
        ("session_id" = i32, Path, description = "id of the diagnostic session"),
    ),
    responses(
        (
            status = OK,
            content_type = "application/json",
            body = InspectionViewDto,
        ),
        (
            status = NOT_FOUND,
            description = "diagnostic session not found",
            body = SimpleError,
        ),
    ),
)]
pub async fn inspection(
    Path(session_id): Path<i32>,
    DbConnection(db): DbConnection,
    Extension(req_user): Extension<RequestUser>,
) -> Result<Json<InspectionViewDto>, (StatusCode, SimpleError)> {
    let view = service::inspection_view(&db, session_id, &req_user.0)
        .await
        .map_err(DbError::from)?;

    Ok(Json(view))
}

/// Saves the suspension inspection of a diagnostic session, signing it if the action is `sign`
///
/// the inspection fields and all part rows are validated and stored together, rows marked
/// with `delete` are removed. a rejected submission stores nothing, every submitted row is
/// echoed back with its replacement hint and errors
#[utoipa::path(
    post,
    tag = "suspension",
    path = "/suspension/{session_id}",
    security(("session_id" = [])),
    params(
        ("session_id" = i32, Path, description = "id of the diagnostic session"),
    ),
    request_body = InspectionSubmission,
    responses(
        (
            status = OK,
            description = "the stored inspection",
            content_type = "application/json",
            body = InspectionViewDto,
        ),
        (
            status = BAD_REQUEST,
            description = "INVALID_INSPECTION",
            body = InspectionRejection,
        ),
        (
            status = CONFLICT,
            description = "INSPECTION_SIGNED",
            body = InspectionRejection,
        ),
        (
            status = NOT_FOUND,
            description = "diagnostic session not found",
            body = SimpleError,
        ),
    ),
)]
pub async fn submit_inspection(
    Path(session_id): Path<i32>,
    DbConnection(db): DbConnection,
    Extension(req_user): Extension<RequestUser>,
    payload: Result<Json<InspectionSubmission>, JsonRejection>,
) -> Result<Json<InspectionViewDto>, Response> {
    let Json(submission) = payload.map_err(|rejection| {
        (rejection.status(), SimpleError::from(rejection.body_text())).into_response()
    })?;

    service::submit_inspection(&db, session_id, &req_user.0, submission)
        .await
        .map_err(SubmitInspectionError::into_response)?;

    let view = service::inspection_view(&db, session_id, &req_user.0)
        .await
        .map_err(|e| <(StatusCode, SimpleError)>::from(DbError(e)).into_response())?;

    Ok(Json(view))
}

/// Attaches a evidence file to the suspension inspection of a diagnostic session
#[utoipa::path(
    post,
    tag = "suspension",
    path = "/suspension/{session_id}/attachment",
    security(("session_id" = [])),
    params(
        ("session_id" = i32, Path, description = "id of the diagnostic session"),
    ),
    request_body(content = AttachmentDto, content_type = "multipart/form-data"),
    responses(
        (
            status = OK,
            description = "the stored attachment",
            content_type = "application/json",
            body = entity::suspension_attachment::Model,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid file extension, invalid fields respond with INVALID_DTO",
            body = SimpleError,
        ),
        (
            status = CONFLICT,
            description = "INSPECTION_SIGNED",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            description = "diagnostic session not found",
            body = SimpleError,
        ),
    ),
)]
pub async fn add_attachment(
    Path(session_id): Path<i32>,
    State(state): State<AppState>,
    Extension(req_user): Extension<RequestUser>,
    ValidatedMultipart(dto): ValidatedMultipart<AttachmentDto>,
) -> Result<Json<suspension_attachment::Model>, (StatusCode, SimpleError)> {
    let session = diagnostic::repository::find_session(&state.db, session_id)
        .await
        .map_err(DbError::from)?;

    let inspection =
        repository::get_or_create_inspection(&state.db, session.id, Some(req_user.id()))
            .await
            .map_err(DbError::from)?;

    if inspection.is_signed() {
        return Err((StatusCode::CONFLICT, SimpleError::from(INSPECTION_SIGNED)));
    }

    let filename =
        multipart_form_data::filename_from_field("evidence", &dto.file, &EVIDENCE_EXTENSIONS)?;

    let key = String::from(S3Key::inspection_attachment(inspection.id, filename));

    state
        .s3
        .upload(key.clone(), dto.file.contents)
        .await
        .map_err(|_| internal_error_msg("failed to upload attachment"))?;

    let caption = dto.caption.unwrap_or_default().trim().to_string();

    match repository::create_attachment(&state.db, inspection.id, key.clone(), caption).await {
        Ok(attachment) => Ok(Json(attachment)),
        Err(e) => {
            let _ = state.s3.delete(key).await;

            Err(DbError::from(e).into())
        }
    }
}
