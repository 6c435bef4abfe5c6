use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Identifiers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Identifiers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Identifiers::Key).string().not_null())
                    .col(ColumnDef::new(Identifiers::Qualifier).string().null())
                    .col(
                        ColumnDef::new(Identifiers::Status)
                            .string_len(16)
                            .not_null()
                            .default("raw"),
                    )
                    .col(
                        ColumnDef::new(Identifiers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Identifiers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_identifiers_key")
                    .table(Identifiers::Table)
                    .col(Identifiers::Key)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_identifiers_status")
                    .table(Identifiers::Table)
                    .col(Identifiers::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Identifiers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Identifiers {
    Table,
    Id,
    Key,
    Qualifier,
    Status,
    CreatedAt,
    UpdatedAt,
}
