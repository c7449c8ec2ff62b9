use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfile::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserProfile::FullName).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSession::SessionToken)
                            .binary()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserSession::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSession::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSession::UserProfileId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("user_session_user_profile_id_foreign")
                            .from(UserSession::Table, UserSession::UserProfileId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiagnosticSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiagnosticSession::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiagnosticSession::UserProfileId).integer().null())
                    .col(ColumnDef::new(DiagnosticSession::Vin).string_len(64).not_null())
                    .col(
                        ColumnDef::new(DiagnosticSession::VehicleModel)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::RawFile)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::Recommendation)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiagnosticSession::Notes).text().not_null())
                    .col(ColumnDef::new(DiagnosticSession::SystemReport).json().not_null())
                    .col(
                        ColumnDef::new(DiagnosticSession::AiGeneratedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::AiDisclaimerVersion)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::ExpertConclusion)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::ExpertName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::ExpertSignedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::Status)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::HandoverTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosticSession::SuspensionComment)
                            .text()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("diagnostic_session_user_profile_id_foreign")
                            .from(DiagnosticSession::Table, DiagnosticSession::UserProfileId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiagnosticCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiagnosticCode::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiagnosticCode::SessionId).integer().not_null())
                    .col(ColumnDef::new(DiagnosticCode::Code).string_len(10).not_null())
                    .col(
                        ColumnDef::new(DiagnosticCode::Description)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiagnosticCode::IsKnown).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("diagnostic_code_session_id_foreign")
                            .from(DiagnosticCode::Table, DiagnosticCode::SessionId)
                            .to(DiagnosticSession::Table, DiagnosticSession::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SensorReading::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorReading::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SensorReading::SessionId).integer().not_null())
                    .col(ColumnDef::new(SensorReading::Timestamp).double().not_null())
                    .col(ColumnDef::new(SensorReading::Name).string_len(64).not_null())
                    .col(ColumnDef::new(SensorReading::Value).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("sensor_reading_session_id_foreign")
                            .from(SensorReading::Table, SensorReading::SessionId)
                            .to(DiagnosticSession::Table, DiagnosticSession::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SuspensionInspection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuspensionInspection::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::SessionId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::InspectorId)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(SuspensionInspection::Comment).text().not_null())
                    .col(
                        ColumnDef::new(SuspensionInspection::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::SignedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::MileageKm)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::TestDrive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::LiftUsed)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionInspection::OverallRisk)
                            .string_len(10)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("suspension_inspection_session_id_foreign")
                            .from(SuspensionInspection::Table, SuspensionInspection::SessionId)
                            .to(DiagnosticSession::Table, DiagnosticSession::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("suspension_inspection_inspector_id_foreign")
                            .from(SuspensionInspection::Table, SuspensionInspection::InspectorId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SuspensionPartType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuspensionPartType::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionPartType::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SuspensionPart::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuspensionPart::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionPart::InspectionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionPart::PartTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionPart::WearPercent)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(SuspensionPart::WearPercent).between(0, 100)),
                    )
                    .col(
                        ColumnDef::new(SuspensionPart::Severity)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuspensionPart::Reason).string_len(64).not_null())
                    .col(ColumnDef::new(SuspensionPart::Evidence).text().not_null())
                    .col(
                        ColumnDef::new(SuspensionPart::PartNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionPart::NeedsReplacement)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("suspension_part_inspection_id_foreign")
                            .from(SuspensionPart::Table, SuspensionPart::InspectionId)
                            .to(SuspensionInspection::Table, SuspensionInspection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("suspension_part_part_type_id_foreign")
                            .from(SuspensionPart::Table, SuspensionPart::PartTypeId)
                            .to(SuspensionPartType::Table, SuspensionPartType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("suspension_part_inspection_id_index")
                    .table(SuspensionPart::Table)
                    .col(SuspensionPart::InspectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SuspensionAttachment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuspensionAttachment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAttachment::InspectionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAttachment::File)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAttachment::Caption)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAttachment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("suspension_attachment_inspection_id_foreign")
                            .from(SuspensionAttachment::Table, SuspensionAttachment::InspectionId)
                            .to(SuspensionInspection::Table, SuspensionInspection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // children first
        let tables = [
            SuspensionAttachment::Table.into_iden(),
            SuspensionPart::Table.into_iden(),
            SuspensionPartType::Table.into_iden(),
            SuspensionInspection::Table.into_iden(),
            SensorReading::Table.into_iden(),
            DiagnosticCode::Table.into_iden(),
            DiagnosticSession::Table.into_iden(),
            UserSession::Table.into_iden(),
            UserProfile::Table.into_iden(),
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserProfile {
    Table,
    Id,
    CreatedAt,
    Username,
    FullName,
}

#[derive(DeriveIden)]
enum UserSession {
    Table,
    SessionToken,
    CreatedAt,
    ExpiresAt,
    UserProfileId,
}

#[derive(DeriveIden)]
enum DiagnosticSession {
    Table,
    Id,
    CreatedAt,
    UserProfileId,
    Vin,
    VehicleModel,
    RawFile,
    Recommendation,
    Notes,
    SystemReport,
    AiGeneratedAt,
    AiDisclaimerVersion,
    ExpertConclusion,
    ExpertName,
    ExpertSignedAt,
    Status,
    HandoverTime,
    SuspensionComment,
}

#[derive(DeriveIden)]
enum DiagnosticCode {
    Table,
    Id,
    SessionId,
    Code,
    Description,
    IsKnown,
}

#[derive(DeriveIden)]
enum SensorReading {
    Table,
    Id,
    SessionId,
    Timestamp,
    Name,
    Value,
}

#[derive(DeriveIden)]
enum SuspensionInspection {
    Table,
    Id,
    SessionId,
    CreatedAt,
    InspectorId,
    Comment,
    Status,
    SignedAt,
    MileageKm,
    TestDrive,
    LiftUsed,
    OverallRisk,
}

#[derive(DeriveIden)]
enum SuspensionPartType {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum SuspensionPart {
    Table,
    Id,
    InspectionId,
    PartTypeId,
    WearPercent,
    Severity,
    Reason,
    Evidence,
    PartNumber,
    NeedsReplacement,
}

#[derive(DeriveIden)]
enum SuspensionAttachment {
    Table,
    Id,
    InspectionId,
    File,
    Caption,
    CreatedAt,
}
