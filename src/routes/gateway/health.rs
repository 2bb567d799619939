use std::collections::BTreeMap;

use axum::{Json, extract::State};
use recipehub_shared::schemas::HealthCheck;

use super::GatewayState;

pub async fn health(State(state): State<GatewayState>) -> Json<HealthCheck> {
    let mut dependencies = BTreeMap::new();

    let auth = match state.auth.get("/health").await {
        Ok(_) => HealthCheck::OK.to_owned(),
        Err(e) => e.to_string(),
    };
    dependencies.insert("auth".to_owned(), auth);

    let queue = if state.queues.is_connected() {
        HealthCheck::OK
    } else {
        "unavailable"
    };
    dependencies.insert("queue".to_owned(), queue.to_owned());

    Json(HealthCheck::from_dependencies(
        env!("CARGO_PKG_VERSION"),
        dependencies,
    ))
}
