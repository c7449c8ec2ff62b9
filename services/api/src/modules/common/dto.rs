use convert_case::{Case, Casing};
use serde::{Deserialize, Deserializer, Serialize};
use shared::entity;
use std::{fmt::Display, str::FromStr};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

#[derive(Deserialize, IntoParams, Validate, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 99999))]
    pub page: u64,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u64,
}

/// Pagination metadata of a executed query.
///
/// this struct also requires `T` on the records field to implement
/// `utoipa::ToSchema` since this struct is intended to be used as
/// a API response with openApi docs generation
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
#[aliases(PaginatedDiagnosticSession = PaginationResult<entity::diagnostic_session::Model>)]
pub struct PaginationResult<T: for<'_s> ToSchema<'_s>> {
    /// 1 Indexed Page number
    ///
    /// used to determine the offset used in the query
    pub page: u64,

    /// Total pages available for the given query
    pub page_count: u64,

    /// Total items available for the given query
    pub item_count: u64,

    /// Amount of records per page
    pub page_size: u64,

    /// Records from the query
    pub records: Vec<T>,
}

/// A validation error of a single request field
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// camel cased name of the field, as sent by the client
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: String::from(field),
            message: String::from(message),
        }
    }

    /// Flattens the errors of a `validator` derive into one error per failed rule,
    /// rules without a message use their code, eg: `length`
    pub fn from_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
        let mut field_errors = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_case(Case::Camel);

                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());

                    FieldError::new(&field, &message)
                })
            })
            .collect::<Vec<_>>();

        field_errors.sort_by(|a, b| a.field.cmp(&b.field));
        field_errors
    }
}

/// Fields of a request that failed validation
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InvalidFieldsDto {
    pub fields: Vec<FieldError>,
}

/// Deserializes `null`, a missing value or a blank string as `None`, anything
/// else is parsed with `FromStr`.
///
/// html forms send unselected options as empty strings, this keeps
/// "not chosen" apart from a chosen value
pub fn blank_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
