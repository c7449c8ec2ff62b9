use crate::modules::{common, diagnostic, suspension};
use crate::server::controller;
use axum::Router;
use shared::entity;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::openapi::InfoBuilder;
use utoipa::{openapi::OpenApiBuilder, Modify, OpenApi};
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        shared::constants::Severity,
        shared::constants::OverallRisk,
        shared::constants::DiagnosticStatus,
        shared::constants::InspectionStatus,

        entity::user_profile::Model,
        entity::diagnostic_code::Model,
        entity::sensor_reading::Model,
        entity::diagnostic_session::Model,
        entity::suspension_part::Model,
        entity::suspension_part_type::Model,
        entity::suspension_inspection::Model,
        entity::suspension_attachment::Model,

        common::dto::PaginatedDiagnosticSession,
        common::responses::SimpleError,
        common::dto::FieldError,
        common::dto::InvalidFieldsDto,
        common::responses::ValidationRejection,
        common::responses::InspectionRejection,

        diagnostic::dto::UploadFormDto,
        diagnostic::dto::ExpertSignDto,
        diagnostic::dto::SessionDetailDto,
        diagnostic::dto::UploadDiagnosticDto,

        suspension::hint::ReplacementHint,
        suspension::dto::PartViewDto,
        suspension::dto::AttachmentDto,
        suspension::dto::PartFeedbackDto,
        suspension::dto::InspectionViewDto,
        suspension::dto::InspectionFeedbackDto,
        suspension::form::SubmitAction,
        suspension::form::PartRowInput,
        suspension::form::InspectionSubmission,
    )),
    paths(
        controller::healthcheck,

        diagnostic::routes::upload_form,
        diagnostic::routes::upload_diagnostic,
        diagnostic::routes::list_sessions,
        diagnostic::routes::session_detail,
        diagnostic::routes::expert_sign,

        suspension::routes::inspection,
        suspension::routes::submit_inspection,
        suspension::routes::add_attachment,
    ),
    modifiers(&SessionIdCookieSecurityScheme),
)]
struct ApiDoc;

/// session id on request cookie for user session authentication,
/// unfortunately this does not work on rapidoc or swagger UI for now, see:
///
/// https://github.com/swagger-api/swagger-js/issues/1163
struct SessionIdCookieSecurityScheme;

impl Modify for SessionIdCookieSecurityScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_id",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "sid",
                    "session identifier",
                ))),
            )
        }
    }
}

pub fn create_openapi_router() -> Router<controller::AppState> {
    let builder: OpenApiBuilder = ApiDoc::openapi().into();

    let info = InfoBuilder::new()
        .title("Diagnostics API")
        .description(Some(
            "Vehicle diagnostic sessions handed over to a suspension inspection.",
        ))
        .version("0.1.0")
        .build();

    let api_doc = builder.info(info).build();

    Router::new()
        .merge(SwaggerUi::new("/swagger").url("/docs/openapi.json", api_doc))
        .merge(RapiDoc::new("/docs/openapi.json").path("/rapidoc"))
}
