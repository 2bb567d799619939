use sqlx_migrator::{Info, Migrate, Migrator, Plan, vec_box};

mod m0001;
pub mod table;
pub mod types;

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec_box![m0001::Migration])?;

    Ok(migrator)
}

/// Applies every pending migration on `conn`.
pub async fn migrate(conn: &mut sqlx::SqliteConnection) -> Result<(), sqlx_migrator::Error> {
    migrator()?.run(conn, &Plan::apply_all()).await
}
