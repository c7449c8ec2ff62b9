use super::{
    dto::{FieldError, InvalidFieldsDto},
    error_codes::INVALID_DTO,
    responses::{ApiError, SimpleError},
};
use crate::server::controller::AppState;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    response::{IntoResponse, Response},
    Json,
};
use axum_typed_multipart::{BaseMultipart, TypedMultipartError};
use http::{request::Parts, StatusCode};
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Runs the `validator` rules of a extracted value, on failure responds with a
/// bad request listing every invalid field
fn validated<T: Validate>(value: T) -> Result<T, Response> {
    match value.validate() {
        Ok(_) => Ok(value),
        Err(e) => {
            let info = InvalidFieldsDto {
                fields: FieldError::from_validation_errors(&e),
            };

            Err((StatusCode::BAD_REQUEST, ApiError::new(INVALID_DTO, info)).into_response())
        }
    }
}

/// Wrapper struct that extracts from the request query exactly `axum::Query<T>`
/// but also requires T to impl `Validate`, if validation fails a bad request code
/// and the invalid fields are returned
#[derive(Clone, Copy)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(payload) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                (rejection.status(), SimpleError::from(rejection.body_text())).into_response()
            })?;

        validated(payload).map(ValidatedQuery)
    }
}

/// Wrapper struct that extracts the request body as json exactly as `axum::Json<T>`
/// but also requires T to impl `Validate`
#[derive(Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                (rejection.status(), SimpleError::from(rejection.body_text())).into_response()
            })?;

        validated(payload).map(ValidatedJson)
    }
}

/// Wrapper struct that extracts the request body from `axum_typed_multipart::TryFromMultipart`
/// but also requires T to impl `Validate`
#[derive(Clone, Copy)]
pub struct ValidatedMultipart<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedMultipart<T>
where
    BaseMultipart<T, TypedMultipartError>: FromRequest<S, Rejection = TypedMultipartError>,
    T: Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let payload = BaseMultipart::<T, TypedMultipartError>::from_request(req, state)
            .await
            .map_err(|rejection| {
                (
                    StatusCode::BAD_REQUEST,
                    SimpleError::from(rejection.to_string()),
                )
                    .into_response()
            })?;

        validated(payload.data).map(ValidatedMultipart)
    }
}

/// Helper to get a DB connection from the state
pub struct DbConnection(pub DatabaseConnection);

#[async_trait]
impl FromRequestParts<AppState> for DbConnection {
    type Rejection = (http::StatusCode, SimpleError);

    async fn from_request_parts(_: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(DbConnection(state.db.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[derive(Validate, Debug)]
    struct Filter {
        #[validate(length(max = 4))]
        vin: String,
    }

    #[tokio::test]
    async fn invalid_values_list_their_fields() {
        let res = validated(Filter {
            vin: String::from("XTA21099"),
        })
        .unwrap_err();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["error"], INVALID_DTO);
        assert_eq!(body["info"]["fields"][0]["field"], "vin");
    }

    #[test]
    fn valid_values_pass_through() {
        let filter = validated(Filter {
            vin: String::from("XTA"),
        })
        .ok()
        .unwrap();

        assert_eq!(filter.vin, "XTA");
    }
}
