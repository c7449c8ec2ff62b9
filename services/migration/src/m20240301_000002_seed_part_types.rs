use sea_orm_migration::prelude::*;

/// parts every suspension inspection can report on
const PART_TYPES: [&str; 10] = [
    "Ball joint",
    "Tie rod end",
    "Inner tie rod",
    "Stabilizer link",
    "Stabilizer bar bushing",
    "Control arm bushing",
    "Shock absorber",
    "Coil spring",
    "CV joint boot",
    "Wheel bearing",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();

        insert
            .into_table(SuspensionPartType::Table)
            .columns([SuspensionPartType::Name]);

        for name in PART_TYPES {
            insert.values_panic([name.into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(SuspensionPartType::Table)
            .and_where(Expr::col(SuspensionPartType::Name).is_in(PART_TYPES))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum SuspensionPartType {
    Table,
    Name,
}
