//! Enumerations stored in the database.

use serde::{Deserialize, Serialize};

pub use crate::domain::InviteStatus;

/// Stored state of a directed friendship record. The perspective-dependent
/// four-state view is derived from this plus the record's direction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LinkStatus {
    Pending,
    Accepted,
}
