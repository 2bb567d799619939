use std::time::Duration;

use anyhow::Result;
use axum::Router;
use recipehub::{
    Config,
    auth::JwtKeys,
    email::Mailer,
    routes::{
        auth::AuthState,
        gateway::{DURABLE_QUEUES, GatewayState},
    },
};
use recipehub_shared::{ChannelPool, QueueSystem, RpcClient, ServiceClient};

fn jwt_keys(config: &Config) -> JwtKeys {
    JwtKeys::new(
        &config.jwt.secret,
        Duration::from_secs(config.jwt.expiration_minutes * 60),
    )
}

fn channel_pool(config: &Config) -> Result<ChannelPool> {
    let system = QueueSystem::new(config.queue.settings()?);

    Ok(ChannelPool::new(system, config.queue.max_channels))
}

pub async fn gateway(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting gateway...");

    let host = host.unwrap_or(config.server.host.to_owned());
    let port = port.unwrap_or(config.server.gateway_port);

    let queues = channel_pool(&config)?;

    let declaring = queues.clone();
    tokio::spawn(async move {
        if let Err(e) = declaring.declare_durable(&DURABLE_QUEUES).await {
            tracing::warn!(error = %e, "Failed to declare gateway queues");
        }
    });

    let state = GatewayState {
        auth: ServiceClient::new(config.services.auth_base_url.to_owned(), "auth"),
        jwt: jwt_keys(&config),
        rpc: RpcClient::new(queues.clone(), config.queue.rpc_timeout()),
        queues: queues.clone(),
        ocr_queue: config.queue.ocr_queue.to_owned(),
    };

    serve(recipehub::routes::gateway::router(state), &host, port).await?;

    tracing::info!("Closing RabbitMQ connection...");
    queues.close().await;

    Ok(())
}

pub async fn auth(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting auth service...");

    let host = host.unwrap_or(config.server.host.to_owned());
    let port = port.unwrap_or(config.server.auth_port);

    let pool =
        recipehub::create_pool(&config.database.url, config.database.max_connections).await?;
    recipehub::db::migrate(&pool).await?;

    let queues = channel_pool(&config)?;

    let state = AuthState {
        pool: pool.clone(),
        jwt: jwt_keys(&config),
        mailer: Mailer::new(queues.clone(), config.queue.email_queue.to_owned()),
        otp_ttl: time::Duration::seconds(config.otp.ttl_secs),
    };

    serve(recipehub::routes::auth::router(state), &host, port).await?;

    queues.close().await;
    pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

pub async fn ingredient(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting ingredient service...");

    let host = host.unwrap_or(config.server.host.to_owned());
    let port = port.unwrap_or(config.server.ingredient_port);

    let pool =
        recipehub::create_pool(&config.database.url, config.database.max_connections).await?;
    recipehub::db::migrate(&pool).await?;

    serve(recipehub::routes::ingredient::router(pool.clone()), &host, port).await?;

    pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

async fn serve(app: Router, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
