//! Client core - session-aware operations over a [`Backend`]
//!
//! [`AuraClient`] keeps the caller's session, the normalized [`FriendGraph`]
//! and the last inbox it saw. Every transition is checked locally first and
//! then issues exactly one backend call. Local state only changes once the
//! server has acknowledged. An `Unauthorized` answer ends the session.
//!
//! The graph is never loaded implicitly. Until [`AuraClient::load_friend_graph`]
//! has run, only the graph-free checks (self-targeting, draft fields,
//! duplicate invitees) happen locally and the server rules on the rest.
//!
//! Overlapping transitions on the same entity are not detected; callers
//! serialize them.

pub mod backend;
pub mod session;

pub use backend::{Backend, ClientConfig, DEFAULT_BASE_URL, HttpBackend, error_from_response};
pub use session::Session;

use crate::domain::{
    AuraError, AuraResult, Field, FriendAction, FriendGraph, FriendshipStatus, Identity, Ping,
    PingDraft, PingId, Response, UserId, next_upcoming, pending_for_me,
};
use crate::dtos::RegisterDTO;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub struct AuraClient<B> {
    backend: B,
    session: Session,
    graph: Option<FriendGraph>,
    inbox: Vec<Ping>,
}

impl<B: Backend> AuraClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: Session::Anonymous,
            graph: None,
            inbox: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The friend graph as of the last load or acknowledged transition
    pub fn friend_graph(&self) -> Option<&FriendGraph> {
        self.graph.as_ref()
    }

    /// The inbox as of the last refresh, ascending by start time
    pub fn pings(&self) -> &[Ping] {
        &self.inbox
    }

    fn token(&self) -> AuraResult<String> {
        self.session
            .token()
            .map(str::to_owned)
            .ok_or(AuraError::Unauthorized)
    }

    fn me(&self) -> AuraResult<UserId> {
        self.session
            .identity()
            .map(|identity| identity.id)
            .ok_or(AuraError::Unauthorized)
    }

    /// Applies the session rules to the outcome of a call.
    fn settle<T>(&mut self, result: AuraResult<T>) -> AuraResult<T> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                debug!("Session rejected by the server, ending it");
                self.logout();
            } else if err.is_ownership_violation() {
                warn!("Ownership violation: {}", err);
            }
        }
        result
    }

    async fn start_session(&mut self, token: String) -> AuraResult<Identity> {
        let identity = self.backend.me(&token).await?;
        self.session = Session::authenticated(token, identity.clone());
        self.graph = None;
        self.inbox.clear();
        debug!(user_id = identity.id, "Session started");
        Ok(identity)
    }

    pub async fn register(&mut self, body: RegisterDTO) -> AuraResult<Identity> {
        body.check()?;
        let result = self.backend.register(&body).await;
        let token = self.settle(result)?;
        self.start_session(token).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> AuraResult<Identity> {
        let result = self.backend.login(email, password).await;
        let token = self.settle(result)?;
        self.start_session(token).await
    }

    pub fn logout(&mut self) {
        self.session.end();
        self.graph = None;
        self.inbox.clear();
    }

    pub async fn search_users(&mut self, query: &str) -> AuraResult<Vec<Identity>> {
        if query.trim().is_empty() {
            return Err(AuraError::validation(Field::Query));
        }
        let token = self.token()?;
        let result = self.backend.search_users(&token, query).await;
        self.settle(result)
    }

    pub async fn user(&mut self, id: UserId) -> AuraResult<Identity> {
        let token = self.token()?;
        let result = self.backend.get_user(&token, id).await;
        self.settle(result)
    }

    /// Loads confirmed friends and incoming requests concurrently and folds
    /// them into a fresh [`FriendGraph`].
    pub async fn load_friend_graph(&mut self) -> AuraResult<&FriendGraph> {
        let token = self.token()?;
        let me = self.me()?;

        let result = tokio::try_join!(
            self.backend.friends(&token),
            self.backend.incoming_requests(&token)
        );
        let (friends, incoming) = self.settle(result)?;

        debug!(
            friends = friends.len(),
            incoming = incoming.len(),
            "Friend graph loaded"
        );
        Ok(&*self.graph.insert(FriendGraph::from_server_lists(me, friends, incoming)))
    }

    async fn transition(
        &mut self,
        target: UserId,
        identity: Option<Identity>,
        action: FriendAction,
    ) -> AuraResult<FriendshipStatus> {
        let token = self.token()?;
        let me = self.me()?;
        let checked = match &self.graph {
            Some(graph) => graph.check(target, action).map(Some),
            None if target == me => Err(AuraError::InvalidInvitee),
            None => Ok(None),
        };
        let expected = self.settle(checked)?;

        let result = self.backend.friend_action(&token, target, action).await;
        let status = self.settle(result)?;
        if let Some(expected) = expected.filter(|expected| *expected != status) {
            debug!(
                expected = expected.as_str(),
                acknowledged = status.as_str(),
                "Server acknowledged a different friendship status"
            );
        }

        if let Some(graph) = self.graph.as_mut() {
            graph.commit(target, identity, status);
        }
        Ok(status)
    }

    pub async fn request_friend(&mut self, target: &Identity) -> AuraResult<FriendshipStatus> {
        self.transition(target.id, Some(target.clone()), FriendAction::Request)
            .await
    }

    pub async fn approve_friend(&mut self, requester: UserId) -> AuraResult<FriendshipStatus> {
        self.transition(requester, None, FriendAction::Approve).await
    }

    pub async fn decline_friend(&mut self, requester: UserId) -> AuraResult<FriendshipStatus> {
        self.transition(requester, None, FriendAction::Decline).await
    }

    pub async fn remove_friend(&mut self, friend: UserId) -> AuraResult<FriendshipStatus> {
        self.transition(friend, None, FriendAction::Remove).await
    }

    fn upsert(&mut self, ping: Ping) {
        match self.inbox.iter_mut().find(|p| p.id == ping.id) {
            Some(existing) => *existing = ping,
            None => self.inbox.push(ping),
        }
        self.inbox
            .sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
    }

    /// Validates `draft` before sending it. Invitees are checked against the
    /// friend graph only when one is loaded.
    pub async fn create_ping(&mut self, draft: PingDraft) -> AuraResult<Ping> {
        let token = self.token()?;
        let graph = self.graph.as_ref();
        draft.validate_at(Utc::now(), |id| graph.is_none_or(|g| g.is_confirmed(id)))?;

        let result = self.backend.create_ping(&token, &draft).await;
        let ping = self.settle(result)?;
        self.upsert(ping.clone());
        Ok(ping)
    }

    pub async fn refresh_inbox(&mut self) -> AuraResult<&[Ping]> {
        let token = self.token()?;
        let result = self.backend.inbox(&token).await;
        self.inbox = self.settle(result)?;
        Ok(&self.inbox)
    }

    pub async fn ping(&mut self, id: PingId) -> AuraResult<Ping> {
        let token = self.token()?;
        let result = self.backend.get_ping(&token, id).await;
        let ping = self.settle(result)?;
        self.upsert(ping.clone());
        Ok(ping)
    }

    /// Answers an invite. A cached ping without an invite for the caller is
    /// rejected locally. An uncached ping is submitted as is and the server
    /// answers `Forbidden` when the caller holds no invite.
    pub async fn respond(&mut self, ping_id: PingId, response: Response) -> AuraResult<Ping> {
        let token = self.token()?;
        let me = self.me()?;

        let not_invited = self
            .inbox
            .iter()
            .find(|p| p.id == ping_id)
            .is_some_and(|p| p.invite_for(me).is_none());
        if not_invited {
            return self.settle(Err(AuraError::InvalidInvitee));
        }

        let result = self.backend.respond(&token, ping_id, response).await;
        let ping = self.settle(result)?;
        self.upsert(ping.clone());
        Ok(ping)
    }

    /// Pings in the cached inbox still waiting on the caller's firm answer
    pub fn pending_count(&self) -> usize {
        match self.session.identity() {
            Some(identity) => pending_for_me(&self.inbox, identity.id),
            None => 0,
        }
    }

    pub fn next_upcoming(&self, now: DateTime<Utc>) -> Option<&Ping> {
        next_upcoming(&self.inbox, now)
    }
}
