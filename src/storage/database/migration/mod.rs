use sea_orm_migration::prelude::*;

mod m20240101_000001_create_identifiers_table;
mod m20240101_000002_create_results_table;

/// Database migrator for the status store
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_identifiers_table::Migration),
            Box::new(m20240101_000002_create_results_table::Migration),
        ]
    }
}
