use super::session::{get_session_id_from_request_headers, SessionId};
use crate::{
    database::error::DbError,
    modules::common::{
        error_codes::{INVALID_SESSION, NO_SID_COOKIE},
        responses::SimpleError,
    },
    server::controller::AppState,
};
use axum::{extract::State, response::Response};
use chrono::Utc;
use http::StatusCode;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use shared::entity::{user_profile, user_session};

/// Simple extractor for routes that are only allowed for logged in users
#[derive(Clone, Debug)]
pub struct RequestUser(pub user_profile::Model);

impl RequestUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }
}

/// Finds the profile owning a non expired session
pub async fn get_user_from_session_id<C: ConnectionTrait>(
    db: &C,
    session_id: SessionId,
) -> Result<Option<user_profile::Model>, DbErr> {
    let found = user_session::Entity::find_by_id(session_id.into_database_value())
        .filter(user_session::Column::ExpiresAt.gt(Utc::now()))
        .find_also_related(user_profile::Entity)
        .one(db)
        .await?;

    Ok(found.and_then(|(_, profile)| profile))
}

/// middleware for routes that require a logged in user, this queries the DB to get the request user by
/// his session ID cookie, adds the following extensions:
///
/// - `SessionId`
/// - `RequestUser`
pub async fn require_user(
    State(state): State<AppState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<Response, (StatusCode, SimpleError)> {
    let session_id = get_session_id_from_request_headers(req.headers())
        .map(SessionId::from)
        .ok_or((StatusCode::UNAUTHORIZED, SimpleError::from(NO_SID_COOKIE)))?;

    let user = get_user_from_session_id(&state.db, session_id)
        .await
        .map_err(DbError::from)?
        .ok_or((StatusCode::UNAUTHORIZED, SimpleError::from(INVALID_SESSION)))?;

    req.extensions_mut().insert(session_id);
    req.extensions_mut().insert(RequestUser(user));

    Ok(next.run(req).await)
}
