use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Points {
    Table,
    Id,
    Name,
    Amount,
}

/// The fixed purchasable bundles shown on the top-up page.
const BUNDLES: [(&str, f64); 3] = [
    ("100 Points", 100.0),
    ("200 Points", 200.0),
    ("500 Points", 500.0),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(Points::Table)
            .columns([Points::Id, Points::Name, Points::Amount])
            .to_owned();
        for (name, amount) in BUNDLES {
            insert.values_panic([
                Uuid::new_v4().into(),
                name.into(),
                amount.into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Points::Table)
            .cond_where(Expr::col(Points::Name).is_in(BUNDLES.map(|(name, _)| name)))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
