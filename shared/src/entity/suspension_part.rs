use crate::constants::Severity;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// One inspected part of a suspension inspection
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, ToSchema)]
#[schema(as = entity::suspension_part::Model)]
#[sea_orm(table_name = "suspension_part")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub inspection_id: i32,
    pub part_type_id: i32,

    /// wear in percent, always within 0 and 100
    pub wear_percent: i16,
    pub severity: Severity,

    /// short reason such as play, cracks, leaks, knocking, corrosion
    pub reason: String,

    /// what was seen, heard or measured
    #[sea_orm(column_type = "Text")]
    pub evidence: String,

    pub part_number: String,

    /// decided by the inspector, never set automatically
    pub needs_replacement: bool,
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
    #[sea_orm(
        belongs_to = "super::suspension_part_type::Entity",
        from = "Column::PartTypeId",
        to = "super::suspension_part_type::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    SuspensionPartType,
}

impl Related<super::suspension_inspection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionInspection.def()
    }
}

impl Related<super::suspension_part_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionPartType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
