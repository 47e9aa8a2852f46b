use serde::{Deserialize, Serialize};

use crate::SERVICE_NAME;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    pub service: String,
}

impl Health {
    pub fn healthy() -> Self {
        Self { status: "healthy".into(), service: SERVICE_NAME.into() }
    }
}

/// Landing document listing the public endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
