use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use shared::{
    constants::{InspectionStatus, OverallRisk},
    entity::{
        suspension_attachment, suspension_inspection, suspension_part, suspension_part_type,
        user_profile,
    },
};

pub async fn find_inspection_by_session<C: ConnectionTrait>(
    db: &C,
    session_id: i32,
) -> Result<Option<suspension_inspection::Model>, DbErr> {
    suspension_inspection::Entity::find()
        .filter(suspension_inspection::Column::SessionId.eq(session_id))
        .one(db)
        .await
}

/// Returns the inspection of a session, creating a empty draft for it when there is none.
///
/// safe to call concurrently for the same session, the unique session id on the table
/// makes every caller end up with the same inspection
pub async fn get_or_create_inspection<C: ConnectionTrait>(
    db: &C,
    session_id: i32,
    inspector_id: Option<i32>,
) -> Result<suspension_inspection::Model, DbErr> {
    if let Some(inspection) = find_inspection_by_session(db, session_id).await? {
        return Ok(inspection);
    }

    let draft = suspension_inspection::ActiveModel {
        session_id: Set(session_id),
        created_at: Set(Utc::now()),
        inspector_id: Set(inspector_id),
        comment: Set(String::new()),
        status: Set(InspectionStatus::Draft),
        signed_at: Set(None),
        mileage_km: Set(None),
        test_drive: Set(false),
        lift_used: Set(true),
        overall_risk: Set(OverallRisk::default()),
        ..Default::default()
    };

    suspension_inspection::Entity::insert(draft)
        .on_conflict(
            OnConflict::column(suspension_inspection::Column::SessionId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    find_inspection_by_session(db, session_id)
        .await?
        .ok_or(DbErr::RecordNotFound(format!(
            "suspension inspection of session {}",
            session_id
        )))
}

pub async fn find_inspection<C: ConnectionTrait>(
    db: &C,
    inspection_id: i32,
) -> Result<suspension_inspection::Model, DbErr> {
    suspension_inspection::Entity::find_by_id(inspection_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!(
            "suspension inspection {}",
            inspection_id
        )))
}

pub async fn find_parts<C: ConnectionTrait>(
    db: &C,
    inspection_id: i32,
) -> Result<Vec<suspension_part::Model>, DbErr> {
    suspension_part::Entity::find()
        .filter(suspension_part::Column::InspectionId.eq(inspection_id))
        .order_by_asc(suspension_part::Column::Id)
        .all(db)
        .await
}

pub async fn find_part_types<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<suspension_part_type::Model>, DbErr> {
    suspension_part_type::Entity::find()
        .order_by_asc(suspension_part_type::Column::Name)
        .all(db)
        .await
}

pub async fn find_attachments<C: ConnectionTrait>(
    db: &C,
    inspection_id: i32,
) -> Result<Vec<suspension_attachment::Model>, DbErr> {
    suspension_attachment::Entity::find()
        .filter(suspension_attachment::Column::InspectionId.eq(inspection_id))
        .order_by_asc(suspension_attachment::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn profile_exists<C: ConnectionTrait>(db: &C, profile_id: i32) -> Result<bool, DbErr> {
    let count = user_profile::Entity::find()
        .filter(user_profile::Column::Id.eq(profile_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

pub async fn create_attachment<C: ConnectionTrait>(
    db: &C,
    inspection_id: i32,
    file: String,
    caption: String,
) -> Result<suspension_attachment::Model, DbErr> {
    suspension_attachment::ActiveModel {
        inspection_id: Set(inspection_id),
        file: Set(file),
        caption: Set(caption),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Removes the given parts of a inspection, ids of other inspections are ignored
pub async fn delete_parts<C: ConnectionTrait>(
    db: &C,
    inspection_id: i32,
    part_ids: Vec<i32>,
) -> Result<u64, DbErr> {
    if part_ids.is_empty() {
        return Ok(0);
    }

    let result = suspension_part::Entity::delete_many()
        .filter(suspension_part::Column::InspectionId.eq(inspection_id))
        .filter(suspension_part::Column::Id.is_in(part_ids))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
