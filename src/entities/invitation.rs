//! Invitation entity - one row per invitee per ping

use super::enums::InviteStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Invitation {
    pub invite_id: i64,
    pub ping_id: i64,
    pub invitee_id: i64,
    pub status: InviteStatus,
    pub responded_at: Option<DateTime<Utc>>,
}
