use super::{form::PartRowInput, hint::ReplacementHint};
use crate::modules::common::dto::FieldError;
use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::Serialize;
use shared::{
    constants::DiagnosticStatus,
    entity::{self, suspension_attachment, suspension_inspection, suspension_part, suspension_part_type},
};
use utoipa::ToSchema;
use validator::Validate;

/// A stored part with the advisory hint for its wear
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PartViewDto {
    #[schema(value_type = entity::suspension_part::Model)]
    pub part: suspension_part::Model,
    pub part_type_name: String,
    pub hint: ReplacementHint,
}

/// Everything needed to render the suspension inspection of a session
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InspectionViewDto {
    pub session_id: i32,
    pub session_vin: String,
    pub session_status: DiagnosticStatus,

    #[schema(value_type = entity::suspension_inspection::Model)]
    pub inspection: suspension_inspection::Model,

    /// if true the inspection is signed and must be shown read only
    pub read_only: bool,

    pub parts: Vec<PartViewDto>,

    #[schema(value_type = Vec<entity::suspension_attachment::Model>)]
    pub attachments: Vec<suspension_attachment::Model>,

    /// catalog of parts that can be inspected
    #[schema(value_type = Vec<entity::suspension_part_type::Model>)]
    pub part_types: Vec<suspension_part_type::Model>,
}

/// A submitted part row echoed back with its advisory hint and errors
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PartFeedbackDto {
    /// position of the row in the submitted `parts`
    pub index: usize,
    pub input: PartRowInput,
    pub hint: ReplacementHint,
    pub errors: Vec<FieldError>,
}

/// Why a inspection submission was rejected, nothing was stored
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InspectionFeedbackDto {
    /// errors of the inspection fields
    pub form_errors: Vec<FieldError>,

    /// every submitted row, valid or not
    pub parts: Vec<PartFeedbackDto>,
}

/// DTO to attach a evidence file to a inspection, should be extracted from `multipart/form-data`
#[derive(TryFromMultipart, Validate, ToSchema)]
pub struct AttachmentDto {
    #[schema(value_type = String, format = Binary)]
    pub file: FieldData<Bytes>,

    #[validate(length(max = 255))]
    pub caption: Option<String>,
}
