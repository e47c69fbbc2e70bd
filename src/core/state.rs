//! Application state shared by every route and middleware

use crate::repositories::{
    FriendshipRepository, InvitationRepository, PingRepository, UserRepository,
};
use sqlx::SqlitePool;

pub struct AppState {
    pub user: UserRepository,

    pub friendship: FriendshipRepository,

    pub ping: PingRepository,

    /// Per-invitee response rows of every ping
    pub invitation: InvitationRepository,

    /// Secret key used to sign access tokens
    pub jwt_secret: String,

    /// Lifetime of an access token, in minutes
    pub jwt_expires_min: i64,
}

impl AppState {
    /// Builds the repositories on top of a shared pool
    pub fn new(pool: SqlitePool, jwt_secret: String, jwt_expires_min: i64) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            friendship: FriendshipRepository::new(pool.clone()),
            ping: PingRepository::new(pool.clone()),
            invitation: InvitationRepository::new(pool),
            jwt_secret,
            jwt_expires_min,
        }
    }
}
