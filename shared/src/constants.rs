use sea_orm::DeriveActiveEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Pipeline status of a diagnostic session.
///
/// variants are declared in pipeline order, a session only ever moves
/// forward, see `DiagnosticStatus::advanced_to`
#[derive(
    Eq,
    Ord,
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    ToSchema,
    Serialize,
    PartialEq,
    PartialOrd,
    Deserialize,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosticStatus {
    /// engine diagnostics finished
    #[sea_orm(string_value = "engine_done")]
    EngineDone,

    /// handed over to the suspension team, waiting for the inspection
    #[sea_orm(string_value = "suspension_pending")]
    SuspensionPending,

    /// suspension inspection saved at least once
    #[sea_orm(string_value = "suspension_done")]
    SuspensionDone,
}

impl DiagnosticStatus {
    /// Returns the status a session should have after being moved to `next`,
    /// never going back in the pipeline.
    pub fn advanced_to(self, next: DiagnosticStatus) -> DiagnosticStatus {
        self.max(next)
    }

    pub fn to_string_vec() -> Vec<String> {
        DiagnosticStatus::iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
    }
}

/// Sign-off status of a suspension inspection
#[derive(
    Eq,
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    ToSchema,
    Serialize,
    PartialEq,
    Deserialize,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InspectionStatus {
    #[sea_orm(string_value = "draft")]
    Draft,

    /// terminal, the inspection and its parts are read only
    #[sea_orm(string_value = "signed")]
    Signed,
}

#[derive(
    Eq,
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    EnumIter,
    ToSchema,
    Serialize,
    PartialEq,
    Deserialize,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverallRisk {
    #[sea_orm(string_value = "low")]
    Low,

    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,

    #[sea_orm(string_value = "high")]
    High,
}

/// How critical the condition of an inspected suspension part is
#[derive(
    Eq,
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    EnumString,
    ToSchema,
    Serialize,
    PartialEq,
    Deserialize,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    #[sea_orm(string_value = "ok")]
    Ok,

    #[sea_orm(string_value = "warn")]
    Warn,

    #[sea_orm(string_value = "crit")]
    Crit,
}
