//! Ping DTOs - Data Transfer Objects for pings and responses

use crate::domain::{NewPing, Response};
use serde::{Deserialize, Serialize};

/// Body of POST /pings/{id}/respond
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct RespondDTO {
    pub status: Response,
}

/// DTO to insert a validated ping together with its invitations
#[derive(Debug, Clone)]
pub struct CreatePingDTO {
    pub creator_id: i64,
    pub ping: NewPing,
    pub ics_secret: String,
}
