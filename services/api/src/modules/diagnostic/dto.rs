use crate::modules::common::{multipart_form_data::REPORT_EXTENSIONS, validators::REGEX_IS_VIN_LIKE};
use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::{Deserialize, Serialize};
use shared::{
    constants::DiagnosticStatus,
    entity::{self, diagnostic_code, diagnostic_session, sensor_reading, suspension_inspection},
};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const VIN_MAX_LENGTH: u64 = 64;
pub const VEHICLE_MODEL_MAX_LENGTH: u64 = 128;

/// DTO to upload a diagnostic report, should be extracted from `multipart/form-data`
#[derive(TryFromMultipart, Validate, ToSchema)]
pub struct UploadDiagnosticDto {
    #[validate(length(max = 64))]
    #[validate(regex(
        path = "REGEX_IS_VIN_LIKE",
        message = "vin must contain only latin letters, digits and dashes"
    ))]
    pub vin: Option<String>,

    #[form_data(field_name = "vehicleModel")]
    #[validate(length(max = 128))]
    pub vehicle_model: Option<String>,

    /// the report file produced by the scan tool
    #[form_data(field_name = "rawFile")]
    #[schema(value_type = String, format = Binary)]
    pub raw_file: FieldData<Bytes>,
}

/// Describes the fields of the upload form, so clients can validate before uploading
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFormDto {
    pub vin_max_length: u64,
    pub vehicle_model_max_length: u64,

    /// lowercase extensions accepted for the report file
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadFormDto {
    fn default() -> Self {
        UploadFormDto {
            vin_max_length: VIN_MAX_LENGTH,
            vehicle_model_max_length: VEHICLE_MODEL_MAX_LENGTH,
            allowed_extensions: REPORT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// A diagnostic session with its detected codes, sensor readings and suspension inspection
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailDto {
    #[schema(value_type = entity::diagnostic_session::Model)]
    pub session: diagnostic_session::Model,

    /// if a expert signed the final conclusion of the session
    pub is_signed: bool,

    #[schema(value_type = Vec<entity::diagnostic_code::Model>)]
    pub codes: Vec<diagnostic_code::Model>,

    #[schema(value_type = Vec<entity::sensor_reading::Model>)]
    pub readings: Vec<sensor_reading::Model>,

    #[schema(value_type = Option<entity::suspension_inspection::Model>)]
    pub inspection: Option<suspension_inspection::Model>,
}

#[derive(Deserialize, IntoParams, Validate, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListSessionsDto {
    /// filters sessions whose VIN contains this value
    #[validate(length(max = 64))]
    pub vin: Option<String>,

    pub status: Option<DiagnosticStatus>,
}

/// Final decision of the diagnostic expert, blank values keep the current ones
#[derive(Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExpertSignDto {
    #[validate(length(max = 128))]
    pub expert_name: Option<String>,

    #[validate(length(max = 10000))]
    pub conclusion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expert_names_are_limited() {
        let dto = ExpertSignDto {
            expert_name: Some("x".repeat(129)),
            conclusion: None,
        };

        assert!(dto.validate().is_err());
        assert!(ExpertSignDto::default().validate().is_ok());
    }

    #[test]
    fn upload_form_lists_report_extensions() {
        let form = UploadFormDto::default();

        assert!(form.allowed_extensions.contains(&String::from("json")));
        assert!(!form.allowed_extensions.contains(&String::from("exe")));
    }
}
