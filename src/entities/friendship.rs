//! Friendship entity - one directed record per pair of users

use super::enums::LinkStatus;
use crate::domain::{FriendshipStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Friendship {
    pub requester_id: i64, // who sent the request
    pub addressee_id: i64, // who received it
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// The counterpart of `me` in this record.
    pub fn other(&self, me: UserId) -> UserId {
        if self.requester_id == me {
            self.addressee_id
        } else {
            self.requester_id
        }
    }

    /// Resolves the record into the four-state view seen by `me`.
    pub fn status_for(&self, me: UserId) -> FriendshipStatus {
        match self.status {
            LinkStatus::Accepted => FriendshipStatus::Confirmed,
            LinkStatus::Pending if self.requester_id == me => FriendshipStatus::RequestedOutgoing,
            LinkStatus::Pending => FriendshipStatus::RequestedIncoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: LinkStatus) -> Friendship {
        Friendship {
            requester_id: 1,
            addressee_id: 2,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn direction_is_resolved_per_caller() {
        let pending = record(LinkStatus::Pending);
        assert_eq!(pending.status_for(1), FriendshipStatus::RequestedOutgoing);
        assert_eq!(pending.status_for(2), FriendshipStatus::RequestedIncoming);
        assert_eq!(pending.other(2), 1);

        let accepted = record(LinkStatus::Accepted);
        assert_eq!(accepted.status_for(1), FriendshipStatus::Confirmed);
        assert_eq!(accepted.status_for(2), FriendshipStatus::Confirmed);
    }
}
