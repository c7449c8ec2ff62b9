use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Identity of a staff member, owned by the content site and shared
/// with the diagnostics workflow
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, ToSchema)]
#[schema(as = entity::user_profile::Model)]
#[sea_orm(table_name = "user_profile")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTime<Utc>,
    #[sea_orm(unique)]
    pub username: String,
    pub full_name: Option<String>,
}

impl Model {
    /// name to show on signatures and logs, the full name if any
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(full_name) if !full_name.trim().is_empty() => full_name.trim(),
            _ => &self.username,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_session::Entity")]
    UserSession,
}

impl Related<super::user_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
