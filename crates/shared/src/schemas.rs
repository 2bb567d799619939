//! Transfer shapes shared between the services.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            code: code.into(),
        }
    }
}

/// Service health, with one entry per dependency ("ok" or a failure reason).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
    pub dependencies: BTreeMap<String, String>,
}

impl HealthCheck {
    pub const OK: &'static str = "ok";
    pub const DEGRADED: &'static str = "degraded";

    /// Builds a report whose status is degraded as soon as one dependency is not ok.
    pub fn from_dependencies(
        version: impl Into<String>,
        dependencies: BTreeMap<String, String>,
    ) -> Self {
        let healthy = dependencies.values().all(|state| state == Self::OK);

        Self {
            status: if healthy { Self::OK } else { Self::DEGRADED }.to_owned(),
            version: version.into(),
            dependencies,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub username: Option<String>,
}

/// Outbound email handed to the notification worker over the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
