//! Create order table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Order::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Order::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Order::OrderItems).json_binary().not_null())
                    .col(ColumnDef::new(Order::UniqueCode).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Order::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (purchase-proof lookups are per user)
        manager
            .create_index(
                Index::create()
                    .name("idx_order_user_id")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await?;

        // Unique index: unique_code
        manager
            .create_index(
                Index::create()
                    .name("idx_order_unique_code")
                    .table(Order::Table)
                    .col(Order::UniqueCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Order {
    Table,
    Id,
    UserId,
    OrderItems,
    UniqueCode,
    CreatedAt,
}
