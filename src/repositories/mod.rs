//! Repositories module - one repository per table
//!
//! Queries are written with the runtime `sqlx::query`/`query_as` builders and
//! `#[derive(sqlx::FromRow)]` entities, so the crate builds without a live
//! database. The schema lives in `migrations/` and is applied at startup with
//! [`migrate`].
//!
//! | Rows expected | Method to call         |
//! |---------------|------------------------|
//! | none          | `.execute(..)`         |
//! | zero or one   | `.fetch_optional(..)`  |
//! | exactly one   | `.fetch_one(..)`       |
//! | many          | `.fetch_all(..)`       |

pub mod friendship;
pub mod invitation;
pub mod ping;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, ReadMany, Update};

pub use friendship::FriendshipRepository;
pub use invitation::{InvitationRepository, UpdateInvitationDTO};
pub use ping::PingRepository;
pub use user::UserRepository;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Applies the embedded migrations to `pool`
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Opens a pool on `database_url` and brings the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database, used by the test suites
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    connect("sqlite::memory:", 1).await
}
