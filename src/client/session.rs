//! Explicit client session.

use crate::domain::Identity;

/// `Anonymous` until a login succeeds, back to `Anonymous` on logout or on
/// the first `Unauthorized` answer. The token is opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { token: String, identity: Identity },
}

impl Session {
    pub fn authenticated(token: impl Into<String>, identity: Identity) -> Self {
        Session::Authenticated {
            token: token.into(),
            identity,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            Session::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn end(&mut self) {
        *self = Session::Anonymous;
    }
}
