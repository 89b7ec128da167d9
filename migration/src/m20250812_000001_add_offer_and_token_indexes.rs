use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Offers {
    Table,
    JobId,
    FreelancerId,
}

#[derive(DeriveIden)]
enum Tokens {
    Table,
    Token,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One offer per freelancer per job.
        manager
            .create_index(
                Index::create()
                    .name("idx_offers_job_freelancer_unique")
                    .table(Offers::Table)
                    .col(Offers::JobId)
                    .col(Offers::FreelancerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tokens_token")
                    .table(Tokens::Table)
                    .col(Tokens::Token)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_offers_job_freelancer_unique")
                    .table(Offers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_tokens_token")
                    .table(Tokens::Table)
                    .to_owned(),
            )
            .await
    }
}
