pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_users_table;
mod m20250801_000002_create_categories_table;
mod m20250801_000003_create_jobs_table;
mod m20250801_000004_create_offers_table;
mod m20250801_000005_create_points_table;
mod m20250801_000006_create_payments_table;
mod m20250801_000007_create_tokens_table;
mod m20250812_000001_add_offer_and_token_indexes;
mod m20250812_000002_seed_point_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_users_table::Migration),
            Box::new(m20250801_000002_create_categories_table::Migration),
            Box::new(m20250801_000003_create_jobs_table::Migration),
            Box::new(m20250801_000004_create_offers_table::Migration),
            Box::new(m20250801_000005_create_points_table::Migration),
            Box::new(m20250801_000006_create_payments_table::Migration),
            Box::new(m20250801_000007_create_tokens_table::Migration),
            Box::new(m20250812_000001_add_offer_and_token_indexes::Migration),
            Box::new(m20250812_000002_seed_point_catalog::Migration),
        ]
    }
}
