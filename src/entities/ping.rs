//! Ping entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Ping {
    pub ping_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub location: String,
    pub notes: String,
    pub starts_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub ics_secret: String, // never leaves the server except inside the export url
    pub created_at: DateTime<Utc>,
}

impl Ping {
    pub fn ics_public_path(&self) -> String {
        format!("/api/pings/{}/ics-public?sig={}", self.ping_id, self.ics_secret)
    }
}
