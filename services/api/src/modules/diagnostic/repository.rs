use super::{
    analyzer::DtcTable,
    dto::{ExpertSignDto, ListSessionsDto, SessionDetailDto},
};
use crate::{
    database::{
        error::DbError,
        helpers::{non_blank_or, paginated_query_to_pagination_result},
    },
    modules::common::dto::{Pagination, PaginationResult},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QueryTrait, Set,
    TransactionTrait,
};
use shared::{
    constants::DiagnosticStatus,
    entity::{diagnostic_code, diagnostic_session, sensor_reading, suspension_inspection},
};

/// codes attached to every uploaded report until a real report parser exists
pub const PLACEHOLDER_CODES: [&str; 2] = ["P0171", "P0420"];

/// version of the disclaimer shown next to generated recommendations
pub const AI_DISCLAIMER_VERSION: &str = "v1";

pub struct NewSession {
    pub vin: String,
    pub vehicle_model: String,

    /// S3 key of the already uploaded report
    pub raw_file: String,

    pub user_profile_id: Option<i32>,
}

/// Creates a diagnostic session from a uploaded report.
///
/// the session is created with the engine diagnostics done and immediately handed over to the
/// suspension team, the detected codes are attached and the recommendation is generated from
/// the DTC table, either all of it is stored or nothing is.
pub async fn create_session(
    db: &DatabaseConnection,
    new: NewSession,
    dtc: &DtcTable,
) -> Result<diagnostic_session::Model, DbErr> {
    let txn = db.begin().await?;

    let session = diagnostic_session::ActiveModel {
        created_at: Set(Utc::now()),
        user_profile_id: Set(new.user_profile_id),
        vin: Set(new.vin),
        vehicle_model: Set(new.vehicle_model),
        raw_file: Set(new.raw_file),
        recommendation: Set(String::new()),
        notes: Set(String::new()),
        system_report: Set(serde_json::json!({})),
        ai_generated_at: Set(None),
        ai_disclaimer_version: Set(String::from(AI_DISCLAIMER_VERSION)),
        expert_conclusion: Set(String::new()),
        expert_name: Set(String::new()),
        expert_signed_at: Set(None),
        status: Set(DiagnosticStatus::EngineDone),
        handover_time: Set(None),
        suspension_comment: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let codes = PLACEHOLDER_CODES;

    diagnostic_code::Entity::insert_many(codes.iter().map(|code| {
        let entry = dtc.lookup(code);

        diagnostic_code::ActiveModel {
            session_id: Set(session.id),
            code: Set(code.to_string()),
            description: Set(entry.map(|e| e.description.clone()).unwrap_or_default()),
            is_known: Set(entry.is_some()),
            ..Default::default()
        }
    }))
    .exec_without_returning(&txn)
    .await?;

    let status = session.status.advanced_to(DiagnosticStatus::SuspensionPending);

    let mut handed_over = session.into_active_model();

    handed_over.status = Set(status);
    handed_over.handover_time = Set(Some(Utc::now()));
    handed_over.recommendation = Set(dtc.analyze(&codes));
    handed_over.ai_generated_at = Set(Some(Utc::now()));

    let session = handed_over.update(&txn).await?;

    txn.commit().await?;

    tracing::info!("[DIAGNOSTIC] created session {} for vin {}", session.id, session.vin);

    Ok(session)
}

pub async fn find_session<C: ConnectionTrait>(
    db: &C,
    session_id: i32,
) -> Result<diagnostic_session::Model, DbErr> {
    diagnostic_session::Entity::find_by_id(session_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!(
            "diagnostic session {}",
            session_id
        )))
}

pub async fn find_session_detail(
    db: &DatabaseConnection,
    session_id: i32,
) -> Result<SessionDetailDto, DbErr> {
    let session = find_session(db, session_id).await?;

    let codes = session
        .find_related(diagnostic_code::Entity)
        .order_by_asc(diagnostic_code::Column::Id)
        .all(db)
        .await?;

    let readings = session
        .find_related(sensor_reading::Entity)
        .order_by_asc(sensor_reading::Column::Timestamp)
        .all(db)
        .await?;

    let inspection = session
        .find_related(suspension_inspection::Entity)
        .one(db)
        .await?;

    Ok(SessionDetailDto {
        is_signed: session.is_signed(),
        session,
        codes,
        readings,
        inspection,
    })
}

/// Lists sessions newest first
pub async fn list_sessions(
    db: &DatabaseConnection,
    filter: ListSessionsDto,
    pagination: Pagination,
) -> Result<PaginationResult<diagnostic_session::Model>, DbError> {
    let query = diagnostic_session::Entity::find()
        .apply_if(filter.vin, |query, vin| {
            let vin = vin.trim().to_string();

            if vin.is_empty() {
                query
            } else {
                query.filter(diagnostic_session::Column::Vin.contains(vin))
            }
        })
        .apply_if(filter.status, |query, status| {
            query.filter(diagnostic_session::Column::Status.eq(status))
        })
        .order_by_desc(diagnostic_session::Column::CreatedAt)
        .order_by_desc(diagnostic_session::Column::Id)
        .paginate(db, pagination.page_size);

    paginated_query_to_pagination_result(query, pagination).await
}

/// Records the final decision of the diagnostic expert.
///
/// blank values keep the current name and conclusion, signing again refreshes the signature time
pub async fn sign_expert(
    db: &DatabaseConnection,
    session_id: i32,
    dto: ExpertSignDto,
) -> Result<diagnostic_session::Model, DbErr> {
    let session = find_session(db, session_id).await?;

    let expert_name = non_blank_or(dto.expert_name, session.expert_name.clone());
    let expert_conclusion = non_blank_or(dto.conclusion, session.expert_conclusion.clone());

    let mut signed = session.into_active_model();

    signed.expert_name = Set(expert_name);
    signed.expert_conclusion = Set(expert_conclusion);
    signed.expert_signed_at = Set(Some(Utc::now()));

    signed.update(db).await
}
