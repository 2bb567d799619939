use sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement};

use crate::table::{User, UserOtp};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(UserOtp::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(UserOtp::Email)
                .string()
                .not_null()
                .string_len(200)
                .primary_key(),
        )
        .col(
            ColumnDef::new(UserOtp::Code)
                .string()
                .not_null()
                .string_len(6),
        )
        .col(ColumnDef::new(UserOtp::ExpiresAt).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_user_otps_user")
                .from(UserOtp::Table, UserOtp::Email)
                .to(User::Table, User::Email)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(UserOtp::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
