use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    Title,
    Description,
    AttachmentUrl,
    CloseTime,
    Duration,
    MinPrice,
    MaxPrice,
    CategoryId,
    OwnerId,
    Status,
    AssignedFreelancerId,
    AssignedOfferId,
    Deadline,
    EscrowFund,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::Title).string().not_null())
                    .col(ColumnDef::new(Jobs::Description).text().not_null())
                    .col(ColumnDef::new(Jobs::AttachmentUrl).string())
                    .col(
                        ColumnDef::new(Jobs::CloseTime)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Jobs::Duration).integer().not_null())
                    .col(
                        ColumnDef::new(Jobs::MinPrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Jobs::MaxPrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Jobs::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Jobs::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Jobs::Status).string().not_null())
                    .col(ColumnDef::new(Jobs::AssignedFreelancerId).uuid())
                    .col(ColumnDef::new(Jobs::AssignedOfferId).uuid())
                    .col(ColumnDef::new(Jobs::Deadline).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Jobs::EscrowFund)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_category")
                            .from(Jobs::Table, Jobs::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_owner")
                            .from(Jobs::Table, Jobs::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}
