use recipehub_db::table::UserOtp;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqliteConnection;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::find_by_email;

pub const OTP_TTL: Duration = Duration::minutes(5);

fn new_code() -> String {
    format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000)
}

/// Stores a fresh six digit code for `email`, replacing any previous one.
pub async fn generate_otp(
    conn: &mut SqliteConnection,
    email: &str,
    ttl: Duration,
) -> recipehub_shared::Result<String> {
    if find_by_email(&mut *conn, email).await?.is_none() {
        recipehub_shared::not_found!("User not found");
    }

    let code = new_code();
    let expires_at = (OffsetDateTime::now_utc() + ttl).unix_timestamp();

    let statement = Query::insert()
        .into_table(UserOtp::Table)
        .columns([UserOtp::Email, UserOtp::Code, UserOtp::ExpiresAt])
        .values_panic([email.into(), code.clone().into(), expires_at.into()])
        .on_conflict(
            OnConflict::column(UserOtp::Email)
                .update_columns([UserOtp::Code, UserOtp::ExpiresAt])
                .to_owned(),
        )
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(code)
}

/// Consumes the code when it matches and has not expired at `now`.
pub async fn verify_otp(
    conn: &mut SqliteConnection,
    email: &str,
    code: &str,
    now: OffsetDateTime,
) -> recipehub_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(UserOtp::Table)
        .and_where(Expr::col(UserOtp::Email).eq(email))
        .and_where(Expr::col(UserOtp::Code).eq(code))
        .and_where(Expr::col(UserOtp::ExpiresAt).gt(now.unix_timestamp()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(result.rows_affected() == 1)
}
