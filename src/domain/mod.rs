//! Domain core shared by the server and the client.
//!
//! Holds the friendship and invite state machines, the ping aggregate with its
//! derived values, and the small helpers used while composing a new ping. No
//! I/O happens here: every function is a plain transformation over values the
//! server reported, so every consumer reaches the same conclusions.

pub mod error;
pub mod friendship;
pub mod identity;
pub mod invite;
pub mod ping;
pub mod schedule;
pub mod vibe;

pub use error::{AuraError, AuraResult, Field};
pub use friendship::{FriendAction, FriendGraph, FriendshipStatus};
pub use identity::{Identity, UserId, rank_search};
pub use invite::{Invite, InviteStatus, Response};
pub use ping::{
    NewPing, Ping, PingDraft, PingId, ResponseTally, invite_summary, next_upcoming, pending_for_me,
    response_tally,
};
pub use schedule::{DayPreset, compose_start};
pub use vibe::Vibe;
