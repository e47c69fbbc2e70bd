//! Ping aggregate: creation rules and the values derived from its invites.

use super::error::{AuraError, AuraResult, Field};
use super::identity::{Identity, UserId};
use super::invite::{Invite, InviteStatus, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

pub type PingId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ping {
    pub id: PingId,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub notes: String,
    pub starts_at: DateTime<Utc>,
    pub creator: Identity,
    pub invites: Vec<Invite>,
    /// Opaque relative path to the calendar export.
    pub ics_public_url: String,
}

impl Ping {
    pub fn invite_for(&self, invitee: UserId) -> Option<&Invite> {
        self.invites.iter().find(|i| i.invitee.id == invitee)
    }

    pub fn is_participant(&self, user: UserId) -> bool {
        self.creator.id == user || self.invite_for(user).is_some()
    }

    /// Records `invitee`'s answer, replacing any earlier one.
    ///
    /// Fails with [`AuraError::InvalidInvitee`] when `invitee` holds no invite
    /// on this ping.
    pub fn respond(&mut self, invitee: UserId, response: Response) -> AuraResult<&Invite> {
        let invite = self
            .invites
            .iter_mut()
            .find(|i| i.invitee.id == invitee)
            .ok_or(AuraError::InvalidInvitee)?;
        invite.respond(response);
        Ok(invite)
    }
}

/// Submission for a new ping, as sent over the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct PingDraft {
    #[validate(length(min = 1, max = 140))]
    pub title: String,
    #[validate(length(min = 1, max = 140))]
    pub location: String,
    pub starts_at: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub invitee_ids: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// A draft that passed every creation rule. Text fields are trimmed and the
/// invitee list keeps submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPing {
    pub title: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub invitee_ids: Vec<UserId>,
    pub notes: String,
}

const FIELD_ORDER: [Field; 5] = [
    Field::Title,
    Field::Location,
    Field::StartsAt,
    Field::InviteeIds,
    Field::Notes,
];

impl PingDraft {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        starts_at: DateTime<Utc>,
        invitee_ids: Vec<UserId>,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            starts_at,
            invitee_ids,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            starts_at: self.starts_at,
            invitee_ids: self.invitee_ids.clone(),
            notes: self.notes.as_ref().map(|n| n.trim().to_string()),
        }
    }

    /// Validates the draft against `now` and the organizer's confirmed
    /// friends. The first failing field in the order title, location,
    /// starts_at, invitee_ids, notes is reported.
    pub fn validate_at(
        &self,
        now: DateTime<Utc>,
        is_confirmed_friend: impl Fn(UserId) -> bool,
    ) -> AuraResult<NewPing> {
        let draft = self.trimmed();
        let mut failed: HashSet<Field> = HashSet::new();

        if let Err(errors) = draft.validate() {
            let by_field = errors.field_errors();
            for field in FIELD_ORDER {
                if by_field.contains_key(field.as_str()) {
                    failed.insert(field);
                }
            }
        }

        if draft.starts_at <= now {
            failed.insert(Field::StartsAt);
        }

        let mut seen = HashSet::new();
        let invitees_ok = draft
            .invitee_ids
            .iter()
            .all(|id| seen.insert(*id) && is_confirmed_friend(*id));
        if !invitees_ok {
            failed.insert(Field::InviteeIds);
        }

        if let Some(field) = FIELD_ORDER.into_iter().find(|f| failed.contains(f)) {
            return Err(AuraError::validation(field));
        }

        Ok(NewPing {
            title: draft.title,
            location: draft.location,
            starts_at: draft.starts_at,
            invitee_ids: draft.invitee_ids,
            notes: draft.notes.unwrap_or_default(),
        })
    }
}

/// Number of pings where `me` still owes a firm answer (`pending` or `maybe`).
pub fn pending_for_me(pings: &[Ping], me: UserId) -> usize {
    pings
        .iter()
        .filter(|p| p.invite_for(me).is_some_and(|i| i.status.is_open()))
        .count()
}

/// The ping with the earliest start strictly after `now`. Ties keep list order.
pub fn next_upcoming(pings: &[Ping], now: DateTime<Utc>) -> Option<&Ping> {
    let mut sorted: Vec<&Ping> = pings.iter().collect();
    sorted.sort_by_key(|p| p.starts_at);
    sorted.into_iter().find(|p| p.starts_at > now)
}

pub fn invite_summary(ping: &Ping) -> Vec<String> {
    ping.invites.iter().map(Invite::summary).collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTally {
    pub pending: usize,
    pub accepted: usize,
    pub declined: usize,
    pub maybe: usize,
}

pub fn response_tally(ping: &Ping) -> ResponseTally {
    ping.invites
        .iter()
        .fold(ResponseTally::default(), |mut tally, invite| {
            match invite.status {
                InviteStatus::Pending => tally.pending += 1,
                InviteStatus::Accepted => tally.accepted += 1,
                InviteStatus::Declined => tally.declined += 1,
                InviteStatus::Maybe => tally.maybe += 1,
            }
            tally
        })
}

#[cfg(test)]
pub(crate) fn ping_with(id: PingId, starts_at: DateTime<Utc>, invites: Vec<Invite>) -> Ping {
    Ping {
        id,
        title: format!("Ping {id}"),
        location: "Bar".into(),
        notes: String::new(),
        starts_at,
        creator: super::identity::identity(1, "Organizer"),
        invites,
        ics_public_url: format!("/api/pings/{id}/ics-public?sig=s3cr3t"),
    }
}
