use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub uptime: u64,
    pub timestamp: DateTime<Utc>,
}
