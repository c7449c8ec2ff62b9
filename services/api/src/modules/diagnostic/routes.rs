use super::{
    dto::{ExpertSignDto, ListSessionsDto, SessionDetailDto, UploadDiagnosticDto, UploadFormDto},
    repository::{self, NewSession},
};
use crate::{
    database::error::DbError,
    modules::{
        auth::{self, middleware::RequestUser},
        common::{
            dto::{Pagination, PaginationResult},
            extractors::{DbConnection, ValidatedJson, ValidatedMultipart, ValidatedQuery},
            multipart_form_data::{self, REPORT_EXTENSIONS},
            responses::{internal_error_msg, SimpleError},
        },
    },
    server::controller::AppState,
    services::s3::S3Key,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use http::StatusCode;
use shared::entity::{self, diagnostic_session};

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/upload", get(upload_form).post(upload_diagnostic))
        .route("/session", get(list_sessions))
        .route("/session/:session_id", get(session_detail))
        .route("/session/:session_id/expert-sign", post(expert_sign))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            auth::middleware::require_user,
        ))
}

/// Describes the diagnostic report upload form
#[utoipa::path(
    get,
    tag = "diagnostic",
    path = "/diagnostic/upload",
    security(("session_id" = [])),
    responses(
        (
            status = OK,
            content_type = "application/json",
            body = UploadFormDto,
        ),
    ),
)]
pub async fn upload_form() -> Json<UploadFormDto> {
    Json(UploadFormDto::default())
}

/// Uploads a diagnostic report
///
/// creates a diagnostic session handed over to the suspension team, with the detected
/// codes and a recommendation generated from them
#[utoipa::path(
    post,
    tag = "diagnostic",
    path = "/diagnostic/upload",
    security(("session_id" = [])),
    request_body(content = UploadDiagnosticDto, content_type = "multipart/form-data"),
    responses(
        (
            status = OK,
            description = "the created session",
            content_type = "application/json",
            body = SessionDetailDto,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid file extension, invalid fields respond with INVALID_DTO",
            body = SimpleError,
        ),
        (
            status = UNAUTHORIZED,
            description = "invalid session",
            body = SimpleError,
        ),
    ),
)]
pub async fn upload_diagnostic(
    State(state): State<AppState>,
    Extension(req_user): Extension<RequestUser>,
    ValidatedMultipart(dto): ValidatedMultipart<UploadDiagnosticDto>,
) -> Result<Json<SessionDetailDto>, (StatusCode, SimpleError)> {
    let filename = multipart_form_data::filename_from_field(
        "report",
        &dto.raw_file,
        &REPORT_EXTENSIONS,
    )?;

    let key = String::from(S3Key::diagnostic_report(filename));

    state
        .s3
        .upload(key.clone(), dto.raw_file.contents)
        .await
        .map_err(|_| internal_error_msg("failed to upload diagnostic report"))?;

    let new_session = NewSession {
        vin: dto.vin.unwrap_or_default().trim().to_string(),
        vehicle_model: dto.vehicle_model.unwrap_or_default().trim().to_string(),
        raw_file: key.clone(),
        user_profile_id: Some(req_user.id()),
    };

    let session = match repository::create_session(&state.db, new_session, &state.dtc).await {
        Ok(session) => session,
        Err(e) => {
            // the report is useless without its session
            let _ = state.s3.delete(key).await;

            return Err(DbError::from(e).into());
        }
    };

    let detail = repository::find_session_detail(&state.db, session.id)
        .await
        .map_err(DbError::from)?;

    Ok(Json(detail))
}

/// Lists diagnostic sessions, newest first
#[utoipa::path(
    get,
    tag = "diagnostic",
    path = "/diagnostic/session",
    security(("session_id" = [])),
    params(
        Pagination,
        ListSessionsDto
    ),
    responses(
        (
            status = OK,
            description = "paginated list of diagnostic sessions",
            content_type = "application/json",
            body = PaginatedDiagnosticSession,
        ),
    ),
)]
pub async fn list_sessions(
    ValidatedQuery(pagination): ValidatedQuery<Pagination>,
    ValidatedQuery(filter): ValidatedQuery<ListSessionsDto>,
    DbConnection(db): DbConnection,
) -> Result<Json<PaginationResult<diagnostic_session::Model>>, (StatusCode, SimpleError)> {
    let result = repository::list_sessions(&db, filter, pagination).await?;

    Ok(Json(result))
}

/// Get a diagnostic session with its codes, readings and suspension inspection
#[utoipa::path(
    get,
    tag = "diagnostic",
    path = "/diagnostic/session/{session_id}",
    security(("session_id" = [])),
    params(
        ("session_id" = i32, Path, description = "id of the diagnostic session"),
    ),
    responses(
        (
            status = OK,
            content_type = "application/json",
            body = SessionDetailDto,
        ),
        (
            status = NOT_FOUND,
            body = SimpleError,
        ),
    ),
)]
pub async fn session_detail(
    Path(session_id): Path<i32>,
    DbConnection(db): DbConnection,
) -> Result<Json<SessionDetailDto>, (StatusCode, SimpleError)> {
    let detail = repository::find_session_detail(&db, session_id)
        .await
        .map_err(DbError::from)?;

    Ok(Json(detail))
}

/// Signs the final conclusion of a diagnostic session as the expert
///
/// blank fields keep their current values, signing again refreshes the signature time
#[utoipa::path(
    post,
    tag = "diagnostic",
    path = "/diagnostic/session/{session_id}/expert-sign",
    security(("session_id" = [])),
    params(
        ("session_id" = i32, Path, description = "id of the diagnostic session"),
    ),
    request_body = ExpertSignDto,
    responses(
        (
            status = OK,
            description = "the signed session",
            content_type = "application/json",
            body = entity::diagnostic_session::Model,
        ),
        (
            status = NOT_FOUND,
            body = SimpleError,
        ),
    ),
)]
pub async fn expert_sign(
    Path(session_id): Path<i32>,
    DbConnection(db): DbConnection,
    Extension(req_user): Extension<RequestUser>,
    ValidatedJson(dto): ValidatedJson<ExpertSignDto>,
) -> Result<Json<diagnostic_session::Model>, (StatusCode, SimpleError)> {
    let session = repository::sign_expert(&db, session_id, dto)
        .await
        .map_err(DbError::from)?;

    tracing::info!(
        "[DIAGNOSTIC] session {} signed by expert {} (user {})",
        session.id,
        session.expert_name,
        req_user.id()
    );

    Ok(Json(session))
}
