use recipehub_user::OTP_TTL;
use temp_dir::TempDir;
use time::{Duration, OffsetDateTime};

mod helpers;

#[tokio::test]
async fn verify_consumes_the_code() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    helpers::create_user(&pool, "john.doe").await?;
    let mut conn = pool.acquire().await?;
    let email = "john.doe@recipehub.localhost";

    let code = recipehub_user::generate_otp(&mut conn, email, OTP_TTL).await?;
    let now = OffsetDateTime::now_utc();

    assert!(!recipehub_user::verify_otp(&mut conn, email, "abcdef", now).await?);
    assert!(recipehub_user::verify_otp(&mut conn, email, &code, now).await?);
    assert!(!recipehub_user::verify_otp(&mut conn, email, &code, now).await?);

    Ok(())
}

#[tokio::test]
async fn expired_codes_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    helpers::create_user(&pool, "john.doe").await?;
    let mut conn = pool.acquire().await?;
    let email = "john.doe@recipehub.localhost";

    let code = recipehub_user::generate_otp(&mut conn, email, OTP_TTL).await?;
    let later = OffsetDateTime::now_utc() + OTP_TTL + Duration::seconds(1);

    assert!(!recipehub_user::verify_otp(&mut conn, email, &code, later).await?);

    Ok(())
}

#[tokio::test]
async fn generate_replaces_the_previous_code() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    helpers::create_user(&pool, "john.doe").await?;
    let mut conn = pool.acquire().await?;
    let email = "john.doe@recipehub.localhost";

    let first = recipehub_user::generate_otp(&mut conn, email, OTP_TTL).await?;
    let second = recipehub_user::generate_otp(&mut conn, email, OTP_TTL).await?;
    let now = OffsetDateTime::now_utc();

    if first != second {
        assert!(!recipehub_user::verify_otp(&mut conn, email, &first, now).await?);
    }
    assert!(recipehub_user::verify_otp(&mut conn, email, &second, now).await?);

    let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_otps")
        .fetch_one(&mut *conn)
        .await?;
    assert_eq!(rows.0, 0);

    Ok(())
}

#[tokio::test]
async fn generate_for_unknown_user_is_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let mut conn = pool.acquire().await?;

    let err = recipehub_user::generate_otp(&mut conn, "ghost@recipehub.localhost", OTP_TTL)
        .await
        .unwrap_err();

    assert!(matches!(err, recipehub_shared::Error::NotFound(_)));

    Ok(())
}
