//! Friendship DTOs

use crate::domain::FriendshipStatus;
use serde::{Deserialize, Serialize};

/// Status reported after a friendship transition, seen from the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendshipDTO {
    pub status: FriendshipStatus,
}

/// DTO to insert a new pending request
#[derive(Debug, Clone)]
pub struct CreateFriendshipDTO {
    pub requester_id: i64,
    pub addressee_id: i64,
}
