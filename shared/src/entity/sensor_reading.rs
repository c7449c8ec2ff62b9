use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[schema(as = entity::sensor_reading::Model)]
#[sea_orm(table_name = "sensor_reading")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: i32,

    /// seconds since the start of the recording
    pub timestamp: f64,
    pub name: String,
    pub value: f64,
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
