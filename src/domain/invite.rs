//! One invitee's slot and response within a ping.

use super::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Maybe,
}

impl InviteStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Declined => "declined",
            InviteStatus::Maybe => "maybe",
        }
    }

    /// Still waiting on a firm answer from the invitee.
    pub fn is_open(&self) -> bool {
        matches!(self, InviteStatus::Pending | InviteStatus::Maybe)
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An answer an invitee can give. There is no way back to `pending`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Accepted,
    Declined,
    Maybe,
}

impl From<Response> for InviteStatus {
    fn from(value: Response) -> Self {
        match value {
            Response::Accepted => InviteStatus::Accepted,
            Response::Declined => InviteStatus::Declined,
            Response::Maybe => InviteStatus::Maybe,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    #[serde(alias = "user")]
    pub invitee: Identity,
    pub status: InviteStatus,
}

impl Invite {
    pub fn pending(invitee: Identity) -> Self {
        Self {
            invitee,
            status: InviteStatus::Pending,
        }
    }

    /// Replaces any earlier answer; changing one's mind is allowed.
    pub fn respond(&mut self, response: Response) {
        self.status = response.into();
    }

    /// `"{name} ({status})"`, the canonical one-line rendering.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.invitee.name, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::identity;

    #[test]
    fn respond_replaces_previous_answer() {
        let mut invite = Invite::pending(identity(2, "Bo"));
        invite.respond(Response::Accepted);
        assert_eq!(invite.status, InviteStatus::Accepted);
        invite.respond(Response::Declined);
        assert_eq!(invite.status, InviteStatus::Declined);
        assert_eq!(invite.summary(), "Bo (declined)");
    }

    #[test]
    fn pending_is_not_a_response() {
        let parsed: Result<Response, _> = serde_json::from_str("\"pending\"");
        assert!(parsed.is_err());
        let parsed: Response = serde_json::from_str("\"maybe\"").unwrap();
        assert_eq!(parsed, Response::Maybe);
    }

    #[test]
    fn wire_invitee_accepts_legacy_user_key() {
        let invite: Invite = serde_json::from_value(serde_json::json!({
            "user": {"id": 3, "name": "Cy", "email": "cy@example.com"},
            "status": "maybe"
        }))
        .unwrap();
        assert_eq!(invite.invitee.id, 3);
        assert!(invite.status.is_open());
    }
}
