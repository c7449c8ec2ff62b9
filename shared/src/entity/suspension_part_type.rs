use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Catalog of suspension parts that can be inspected, eg: ball joint, tie rod end
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, ToSchema)]
#[schema(as = entity::suspension_part_type::Model)]
#[sea_orm(table_name = "suspension_part_type")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::suspension_part::Entity")]
    SuspensionPart,
}

impl Related<super::suspension_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionPart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
