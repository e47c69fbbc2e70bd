//! Entities module - rows persisted in the database.
//!
//! Each entity maps to one table. The perspective-free storage shape lives
//! here; the `domain` module owns how those rows are interpreted.

pub mod enums;
pub mod friendship;
pub mod invitation;
pub mod ping;
pub mod user;

pub use enums::{InviteStatus, LinkStatus};
pub use friendship::Friendship;
pub use invitation::Invitation;
pub use ping::Ping;
pub use user::User;
