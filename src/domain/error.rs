//! Error taxonomy shared by the server and the client.

use std::fmt;
use thiserror::Error;

/// Input field reported by a validation failure.
///
/// Ping creation checks its fields in declaration order, so a submission with
/// several invalid fields always reports the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Location,
    StartsAt,
    InviteeIds,
    Notes,
    Email,
    Name,
    Password,
    Query,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Location => "location",
            Field::StartsAt => "starts_at",
            Field::InviteeIds => "invitee_ids",
            Field::Notes => "notes",
            Field::Email => "email",
            Field::Name => "name",
            Field::Password => "password",
            Field::Query => "q",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [
            Field::Title,
            Field::Location,
            Field::StartsAt,
            Field::InviteeIds,
            Field::Notes,
            Field::Email,
            Field::Name,
            Field::Password,
            Field::Query,
        ]
        .into_iter()
        .find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuraError {
    #[error("validation failed for field `{field}`")]
    Validation { field: Field },

    #[error("already connected")]
    AlreadyConnected,

    #[error("a friend request already exists")]
    AlreadyRequested,

    #[error("no pending friend request")]
    NoSuchRequest,

    #[error("not connected")]
    NotConnected,

    #[error("forbidden")]
    Forbidden,

    #[error("caller is not an invitee of this ping")]
    InvalidInvitee,

    #[error("session is not authorized")]
    Unauthorized,

    #[error("network error ({}): {message}", status.map(|s| s.to_string()).unwrap_or_else(|| "transport".into()))]
    Network { status: Option<u16>, message: String },
}

impl AuraError {
    pub fn validation(field: Field) -> Self {
        AuraError::Validation { field }
    }

    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        AuraError::Network {
            status,
            message: message.into(),
        }
    }

    /// Stable machine-readable code, also used on the wire.
    pub const fn code(&self) -> &'static str {
        match self {
            AuraError::Validation { .. } => "validation_error",
            AuraError::AlreadyConnected => "already_connected",
            AuraError::AlreadyRequested => "already_requested",
            AuraError::NoSuchRequest => "no_such_request",
            AuraError::NotConnected => "not_connected",
            AuraError::Forbidden => "forbidden",
            AuraError::InvalidInvitee => "invalid_invitee",
            AuraError::Unauthorized => "unauthorized",
            AuraError::Network { .. } => "network_error",
        }
    }

    /// Short text meant for the field or action that failed.
    pub fn user_message(&self) -> String {
        match self {
            AuraError::Validation { field } => match field {
                Field::Title => "Please give the ping a title.".into(),
                Field::Location => "Please pick a location.".into(),
                Field::StartsAt => "The start time must be in the future.".into(),
                Field::InviteeIds => "Invite at least one of your friends.".into(),
                Field::Notes => "Notes are too long.".into(),
                Field::Email => "Please enter a valid email.".into(),
                Field::Name => "Please enter your name.".into(),
                Field::Password => "Password is too short.".into(),
                Field::Query => "Type something to search for.".into(),
            },
            AuraError::AlreadyConnected => "You are already friends.".into(),
            AuraError::AlreadyRequested => "A friend request is already pending.".into(),
            AuraError::NoSuchRequest => "There is no pending request from this person.".into(),
            AuraError::NotConnected => "You are not friends.".into(),
            AuraError::Forbidden | AuraError::InvalidInvitee => "You can't do that.".into(),
            AuraError::Unauthorized => "Your session has expired, please log in again.".into(),
            AuraError::Network { status, .. } => match status {
                Some(code) => format!("Something went wrong ({code})."),
                None => "Could not reach the server.".into(),
            },
        }
    }

    /// Errors that end the current session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuraError::Unauthorized)
    }

    /// Ownership violations are never retried and always logged.
    pub fn is_ownership_violation(&self) -> bool {
        matches!(self, AuraError::Forbidden | AuraError::InvalidInvitee)
    }
}

pub type AuraResult<T> = Result<T, AuraError>;
