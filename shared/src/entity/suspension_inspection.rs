use crate::constants::{InspectionStatus, OverallRisk};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// The suspension inspection of a diagnostic session, there is at most one per session.
///
/// once `status` is `signed` the inspection and its parts must be treated as read only,
/// this is enforced by the api handlers and not by the database.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, ToSchema)]
#[schema(as = entity::suspension_inspection::Model)]
#[sea_orm(table_name = "suspension_inspection")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub session_id: i32,
    pub created_at: DateTime<Utc>,

    /// profile of the mechanic responsible for the inspection
    pub inspector_id: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub comment: String,

    pub status: InspectionStatus,
    pub signed_at: Option<DateTime<Utc>>,

    pub mileage_km: Option<i32>,
    pub test_drive: bool,
    pub lift_used: bool,
    pub overall_risk: OverallRisk,
}

impl Model {
    pub fn is_signed(&self) -> bool {
        self.status == InspectionStatus::Signed
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::diagnostic_session::Entity",
        from = "Column::SessionId",
        to = "super::diagnostic_session::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    DiagnosticSession,
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::InspectorId",
        to = "super::user_profile::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Inspector,
    #[sea_orm(has_many = "super::suspension_part::Entity")]
    SuspensionPart,
    #[sea_orm(has_many = "super::suspension_attachment::Entity")]
    SuspensionAttachment,
}

impl Related<super::diagnostic_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiagnosticSession.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inspector.def()
    }
}

impl Related<super::suspension_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionPart.def()
    }
}

impl Related<super::suspension_attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionAttachment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
