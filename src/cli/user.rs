use clap::ValueEnum;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Status {
    Active,
    Inactive,
}

pub async fn set_status(
    config: recipehub::Config,
    email: String,
    status: Status,
) -> anyhow::Result<()> {
    let pool = recipehub::create_pool(&config.database.url, 1).await?;
    let mut conn = pool.acquire().await?;

    let Some(user) = recipehub_user::find_by_email(&mut conn, &email).await? else {
        tracing::error!("user {email} not found");
        return Ok(());
    };

    recipehub_user::set_active(&mut conn, user.id, status == Status::Active).await?;

    tracing::info!(user_id = user.id, active = status == Status::Active, "User status updated");

    drop(conn);
    pool.close().await;

    Ok(())
}
