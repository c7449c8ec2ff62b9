use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Photo or file kept as evidence of a suspension inspection
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, ToSchema)]
#[schema(as = entity::suspension_attachment::Model)]
#[sea_orm(table_name = "suspension_attachment")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub inspection_id: i32,

    /// S3 object key
    pub file: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::suspension_inspection::Entity",
        from = "Column::InspectionId",
        to = "super::suspension_inspection::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    SuspensionInspection,
}

impl Related<super::suspension_inspection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionInspection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
