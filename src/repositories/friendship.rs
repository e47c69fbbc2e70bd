//! FriendshipRepository - directed friendship records
//!
//! A pair of users has at most one record, whichever direction it was
//! created in. Every lookup therefore matches both orientations.

use super::{Create, Delete, Read};
use crate::dtos::CreateFriendshipDTO;
use crate::entities::{Friendship, LinkStatus};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const SELECT_PAIR: &str = r#"
    SELECT requester_id, addressee_id, status, created_at
    FROM friendships
    WHERE (requester_id = ? AND addressee_id = ?) OR (requester_id = ? AND addressee_id = ?)
"#;

pub struct FriendshipRepository {
    connection_pool: SqlitePool,
}

impl FriendshipRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Ids of every confirmed friend of `user_id`
    pub async fn friend_ids(&self, user_id: i64) -> Result<Vec<i64>, Error> {
        let rows = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT requester_id, addressee_id, status, created_at
            FROM friendships
            WHERE status = ? AND (requester_id = ? OR addressee_id = ?)
            "#,
        )
        .bind(LinkStatus::Accepted)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.iter().map(|f| f.other(user_id)).collect())
    }

    /// Requesters of pending requests addressed to `user_id`, oldest first
    pub async fn incoming_requester_ids(&self, user_id: i64) -> Result<Vec<i64>, Error> {
        let mut rows = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT requester_id, addressee_id, status, created_at
            FROM friendships
            WHERE status = ? AND addressee_id = ?
            "#,
        )
        .bind(LinkStatus::Pending)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        rows.sort_by_key(|f| f.created_at);
        Ok(rows.into_iter().map(|f| f.requester_id).collect())
    }

    /// Marks the pending request of `requester_id` to `addressee_id` as accepted
    pub async fn accept(&self, requester_id: i64, addressee_id: i64) -> Result<(), Error> {
        let result = sqlx::query(
            "UPDATE friendships SET status = ? WHERE requester_id = ? AND addressee_id = ? AND status = ?",
        )
        .bind(LinkStatus::Accepted)
        .bind(requester_id)
        .bind(addressee_id)
        .bind(LinkStatus::Pending)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }
}

impl Create<Friendship, CreateFriendshipDTO> for FriendshipRepository {
    async fn create(&self, data: &CreateFriendshipDTO) -> Result<Friendship, Error> {
        let now = Utc::now();
        let status = LinkStatus::Pending;

        sqlx::query(
            "INSERT INTO friendships (requester_id, addressee_id, status, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.requester_id)
        .bind(data.addressee_id)
        .bind(status)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(Friendship {
            requester_id: data.requester_id,
            addressee_id: data.addressee_id,
            status,
            created_at: now,
        })
    }
}

/// Reads the record between an unordered pair of users
impl Read<Friendship, (i64, i64)> for FriendshipRepository {
    async fn read(&self, id: &(i64, i64)) -> Result<Option<Friendship>, Error> {
        let (a, b) = *id;
        sqlx::query_as::<_, Friendship>(SELECT_PAIR)
            .bind(a)
            .bind(b)
            .bind(b)
            .bind(a)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

/// Deletes the record between an unordered pair of users, in either state
impl Delete<(i64, i64)> for FriendshipRepository {
    async fn delete(&self, id: &(i64, i64)) -> Result<(), Error> {
        let (a, b) = *id;
        sqlx::query(
            "DELETE FROM friendships WHERE (requester_id = ? AND addressee_id = ?) OR (requester_id = ? AND addressee_id = ?)",
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .execute(&self.connection_pool)
        .await?;

        Ok(())
    }
}
