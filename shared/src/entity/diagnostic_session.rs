use crate::constants::DiagnosticStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// One vehicle visit, from the engine report upload up to
/// the signed suspension inspection
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[schema(as = entity::diagnostic_session::Model)]
#[sea_orm(table_name = "diagnostic_session")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTime<Utc>,

    /// profile of the user who uploaded the report, `None` for imported reports
    pub user_profile_id: Option<i32>,

    pub vin: String,
    pub vehicle_model: String,

    /// S3 object key of the uploaded report file
    pub raw_file: String,

    #[sea_orm(column_type = "Text")]
    pub recommendation: String,

    #[sea_orm(column_type = "Text")]
    pub notes: String,

    /// facts, hypotheses and a check plan per vehicle system
    #[schema(value_type = Object)]
    pub system_report: Json,

    pub ai_generated_at: Option<DateTime<Utc>>,
    pub ai_disclaimer_version: String,

    #[sea_orm(column_type = "Text")]
    pub expert_conclusion: String,
    pub expert_name: String,
    pub expert_signed_at: Option<DateTime<Utc>>,

    pub status: DiagnosticStatus,

    /// when the session was handed over to the suspension team
    pub handover_time: Option<DateTime<Utc>>,

    /// copy of the latest suspension inspection comment, kept for older clients
    #[sea_orm(column_type = "Text", nullable)]
    pub suspension_comment: Option<String>,
}

impl Model {
    pub fn is_signed(&self) -> bool {
        self.expert_signed_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserProfileId",
        to = "super::user_profile::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    UserProfile,
    #[sea_orm(has_many = "super::diagnostic_code::Entity")]
    DiagnosticCode,
    #[sea_orm(has_many = "super::sensor_reading::Entity")]
    SensorReading,
    #[sea_orm(has_one = "super::suspension_inspection::Entity")]
    SuspensionInspection,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl Related<super::diagnostic_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiagnosticCode.def()
    }
}

impl Related<super::sensor_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorReading.def()
    }
}

impl Related<super::suspension_inspection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionInspection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
