use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// A trouble code detected on a diagnostic session
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, ToSchema)]
#[schema(as = entity::diagnostic_code::Model)]
#[sea_orm(table_name = "diagnostic_code")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: i32,
    pub code: String,
    pub description: String,
    pub is_known: bool,
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
}

impl Related<super::diagnostic_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiagnosticSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
