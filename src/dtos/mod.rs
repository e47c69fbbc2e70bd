//! DTOs module - Data Transfer Objects
//!
//! Request and response bodies of the HTTP API, plus the insert DTOs consumed
//! by the repositories. Shapes that the client also reads (identities, pings)
//! are the `domain` types themselves.

pub mod friendship;
pub mod ping;
pub mod query;
pub mod user;

pub use crate::domain::PingDraft;
pub use friendship::{CreateFriendshipDTO, FriendshipDTO};
pub use ping::{CreatePingDTO, RespondDTO};
pub use query::{IcsQuery, UserSearchQuery};
pub use user::{CreateUserDTO, DEFAULT_TIMEZONE, LoginDTO, RegisterDTO, TokenDTO};
