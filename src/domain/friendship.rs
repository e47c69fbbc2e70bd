//! Friendship state machine, always evaluated from the caller's side.
//!
//! ```text
//!   none ──request()──▶ requested_outgoing
//!   none ◀─(server)───▶ requested_incoming ──approve()──▶ confirmed
//!                       requested_incoming ──decline()──▶ none
//!   confirmed ──remove()──▶ none
//! ```

use super::error::{AuraError, AuraResult};
use super::identity::{Identity, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    #[default]
    None,
    RequestedOutgoing,
    RequestedIncoming,
    Confirmed,
}

impl FriendshipStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::None => "none",
            FriendshipStatus::RequestedOutgoing => "requested_outgoing",
            FriendshipStatus::RequestedIncoming => "requested_incoming",
            FriendshipStatus::Confirmed => "confirmed",
        }
    }
}

/// Transition requested on a friendship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendAction {
    Request,
    Approve,
    Decline,
    Remove,
}

impl FriendshipStatus {
    /// Returns the state reached by applying `action`, or the precondition
    /// error if `action` is not legal from `self`.
    pub fn transition(self, action: FriendAction) -> AuraResult<FriendshipStatus> {
        use FriendshipStatus::*;
        match (action, self) {
            (FriendAction::Request, None) => Ok(RequestedOutgoing),
            (FriendAction::Request, Confirmed) => Err(AuraError::AlreadyConnected),
            (FriendAction::Request, RequestedOutgoing | RequestedIncoming) => {
                Err(AuraError::AlreadyRequested)
            }

            (FriendAction::Approve, RequestedIncoming) => Ok(Confirmed),
            (FriendAction::Decline, RequestedIncoming) => Ok(None),
            (FriendAction::Approve | FriendAction::Decline, _) => Err(AuraError::NoSuchRequest),

            (FriendAction::Remove, Confirmed) => Ok(None),
            (FriendAction::Remove, _) => Err(AuraError::NotConnected),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    identity: Option<Identity>,
    status: FriendshipStatus,
}

/// Normalized view of the caller's friend graph.
///
/// The server exposes two independent lists (confirmed friends and incoming
/// requests); this folds them into one status per counterpart so nothing
/// downstream has to reason about the lists separately. Counterparts that
/// are not tracked are implicitly `none`.
#[derive(Debug, Clone, Default)]
pub struct FriendGraph {
    me: UserId,
    entries: HashMap<UserId, Entry>,
    incoming_order: Vec<UserId>,
}

impl FriendGraph {
    pub fn new(me: UserId) -> Self {
        Self {
            me,
            entries: HashMap::new(),
            incoming_order: Vec::new(),
        }
    }

    /// Builds the graph from the two server projections. An identity reported
    /// in both lists is treated as confirmed.
    pub fn from_server_lists(me: UserId, friends: Vec<Identity>, incoming: Vec<Identity>) -> Self {
        let mut graph = Self::new(me);
        for identity in incoming {
            graph.set(identity.id, Some(identity), FriendshipStatus::RequestedIncoming);
        }
        for identity in friends {
            graph.set(identity.id, Some(identity), FriendshipStatus::Confirmed);
        }
        graph
    }

    pub fn me(&self) -> UserId {
        self.me
    }

    pub fn status_of(&self, id: UserId) -> FriendshipStatus {
        self.entries
            .get(&id)
            .map(|e| e.status)
            .unwrap_or(FriendshipStatus::None)
    }

    /// Checks that `action` is legal against `target` and returns the state
    /// the server is expected to acknowledge. Does not modify the graph.
    pub fn check(&self, target: UserId, action: FriendAction) -> AuraResult<FriendshipStatus> {
        if target == self.me {
            return Err(AuraError::InvalidInvitee);
        }
        self.status_of(target).transition(action)
    }

    /// Records a server-acknowledged status for `target`.
    pub fn commit(&mut self, target: UserId, identity: Option<Identity>, status: FriendshipStatus) {
        self.set(target, identity, status);
    }

    fn set(&mut self, id: UserId, identity: Option<Identity>, status: FriendshipStatus) {
        self.incoming_order.retain(|other| *other != id);
        if status == FriendshipStatus::RequestedIncoming {
            self.incoming_order.push(id);
        }

        if status == FriendshipStatus::None {
            self.entries.remove(&id);
            return;
        }

        let entry = self.entries.entry(id).or_insert(Entry {
            identity: None,
            status,
        });
        entry.status = status;
        if identity.is_some() {
            entry.identity = identity;
        }
    }

    fn with_status(&self, status: FriendshipStatus) -> impl Iterator<Item = &Identity> {
        self.entries
            .values()
            .filter(move |e| e.status == status)
            .filter_map(|e| e.identity.as_ref())
    }

    /// Confirmed friends ordered by name, then id.
    pub fn friends(&self) -> Vec<&Identity> {
        let mut friends: Vec<&Identity> = self.with_status(FriendshipStatus::Confirmed).collect();
        friends.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        friends
    }

    /// Incoming requests in the order the server reported them.
    pub fn incoming_requests(&self) -> Vec<&Identity> {
        self.incoming_order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter_map(|e| e.identity.as_ref())
            .collect()
    }

    pub fn is_confirmed(&self, id: UserId) -> bool {
        self.status_of(id) == FriendshipStatus::Confirmed
    }

    pub fn confirmed_ids(&self) -> Vec<UserId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.status == FriendshipStatus::Confirmed)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::identity;
    use FriendshipStatus as S;

    const ALL: [FriendshipStatus; 4] = [S::None, S::RequestedOutgoing, S::RequestedIncoming, S::Confirmed];

    #[test]
    fn request_only_from_none() {
        assert_eq!(S::None.transition(FriendAction::Request), Ok(S::RequestedOutgoing));
        assert_eq!(
            S::Confirmed.transition(FriendAction::Request),
            Err(AuraError::AlreadyConnected)
        );
        assert_eq!(
            S::RequestedOutgoing.transition(FriendAction::Request),
            Err(AuraError::AlreadyRequested)
        );
        assert_eq!(
            S::RequestedIncoming.transition(FriendAction::Request),
            Err(AuraError::AlreadyRequested)
        );
    }

    #[test]
    fn approve_and_decline_need_an_incoming_request() {
        for status in ALL {
            let approve = status.transition(FriendAction::Approve);
            let decline = status.transition(FriendAction::Decline);
            if status == S::RequestedIncoming {
                assert_eq!(approve, Ok(S::Confirmed));
                assert_eq!(decline, Ok(S::None));
            } else {
                assert_eq!(approve, Err(AuraError::NoSuchRequest));
                assert_eq!(decline, Err(AuraError::NoSuchRequest));
            }
        }
    }

    #[test]
    fn remove_needs_confirmed() {
        for status in ALL {
            let removed = status.transition(FriendAction::Remove);
            if status == S::Confirmed {
                assert_eq!(removed, Ok(S::None));
            } else {
                assert_eq!(removed, Err(AuraError::NotConnected));
            }
        }
    }

    #[test]
    fn approve_then_remove_returns_to_none() {
        let mut graph = FriendGraph::from_server_lists(1, vec![], vec![identity(2, "Bo")]);
        assert_eq!(graph.status_of(2), S::RequestedIncoming);

        let next = graph.check(2, FriendAction::Approve).unwrap();
        graph.commit(2, None, next);
        assert_eq!(graph.status_of(2), S::Confirmed);
        assert_eq!(graph.friends()[0].name, "Bo");
        assert!(graph.incoming_requests().is_empty());

        let next = graph.check(2, FriendAction::Remove).unwrap();
        graph.commit(2, None, next);
        assert_eq!(graph.status_of(2), S::None);
        assert!(graph.friends().is_empty());
    }

    #[test]
    fn request_on_confirmed_leaves_state_unchanged() {
        let graph = FriendGraph::from_server_lists(1, vec![identity(2, "Bo")], vec![]);
        assert_eq!(graph.check(2, FriendAction::Request), Err(AuraError::AlreadyConnected));
        assert_eq!(graph.status_of(2), S::Confirmed);
    }

    #[test]
    fn projections_agree_when_server_lists_overlap() {
        let graph = FriendGraph::from_server_lists(
            1,
            vec![identity(3, "Cy")],
            vec![identity(3, "Cy"), identity(4, "Di"), identity(2, "Bo")],
        );

        assert_eq!(graph.status_of(3), S::Confirmed);
        let incoming: Vec<UserId> = graph.incoming_requests().iter().map(|i| i.id).collect();
        assert_eq!(incoming, vec![4, 2]);
        for friend in graph.friends() {
            assert_eq!(graph.status_of(friend.id), S::Confirmed);
            assert!(!incoming.contains(&friend.id));
        }
    }

    #[test]
    fn declined_request_can_be_requested_again() {
        let mut graph = FriendGraph::from_server_lists(1, vec![], vec![identity(2, "Bo")]);
        let next = graph.check(2, FriendAction::Decline).unwrap();
        graph.commit(2, None, next);
        assert_eq!(graph.check(2, FriendAction::Request), Ok(S::RequestedOutgoing));
    }

    #[test]
    fn cannot_target_self() {
        let graph = FriendGraph::new(7);
        assert_eq!(graph.check(7, FriendAction::Request), Err(AuraError::InvalidInvitee));
    }
}
