use std::collections::BTreeMap;

use axum::{Json, extract::State};
use recipehub_shared::schemas::HealthCheck;
use sqlx::SqlitePool;

/// Reports the service version and whether the database answers.
pub async fn health(State(pool): State<SqlitePool>) -> Json<HealthCheck> {
    let database = match crate::db::ping(&pool).await {
        Ok(()) => HealthCheck::OK.to_owned(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed: database unavailable");
            "unavailable".to_owned()
        }
    };

    Json(HealthCheck::from_dependencies(
        env!("CARGO_PKG_VERSION"),
        BTreeMap::from([("database".to_owned(), database)]),
    ))
}
