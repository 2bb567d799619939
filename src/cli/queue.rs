use recipehub_shared::QueueSystem;

pub async fn diagnose(config: recipehub::Config) -> anyhow::Result<()> {
    let system = QueueSystem::new(config.queue.settings()?);
    let diagnostics = system.diagnose().await;

    if !diagnostics.network_reachable {
        tracing::warn!(
            host = %diagnostics.host,
            port = diagnostics.port,
            "RabbitMQ is not reachable"
        );
    }

    println!("{}", serde_json::to_string_pretty(&diagnostics)?);

    Ok(())
}
