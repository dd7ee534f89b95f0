use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

// Database entity models
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Site {
    pub id: i64,
    pub site_name: String,
    pub site_location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VolumeMeasurement {
    pub id: i64,
    /// Epoch seconds at the start of the hour
    pub timestamp: i64,
    pub volume: i64,
    pub site_id: i64,
    pub created_at: DateTime<Utc>,
}
