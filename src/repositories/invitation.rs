//! InvitationRepository - per-invitee response rows

use super::{Read, Update};
use crate::entities::{Invitation, InviteStatus};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const INVITATION_COLUMNS: &str = "invite_id, ping_id, invitee_id, status, responded_at";

/// DTO to record an invitee's answer (only the status is mutable)
#[derive(Debug, Clone, Copy)]
pub struct UpdateInvitationDTO {
    pub status: InviteStatus,
}

pub struct InvitationRepository {
    connection_pool: SqlitePool,
}

impl InvitationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Invitations of a ping in the order they were issued
    pub async fn find_by_ping(&self, ping_id: i64) -> Result<Vec<Invitation>, Error> {
        sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE ping_id = ? ORDER BY invite_id ASC"
        ))
        .bind(ping_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

/// Keyed by `(ping_id, invitee_id)`
impl Read<Invitation, (i64, i64)> for InvitationRepository {
    async fn read(&self, id: &(i64, i64)) -> Result<Option<Invitation>, Error> {
        let (ping_id, invitee_id) = *id;
        sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE ping_id = ? AND invitee_id = ?"
        ))
        .bind(ping_id)
        .bind(invitee_id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Invitation, UpdateInvitationDTO, (i64, i64)> for InvitationRepository {
    async fn update(&self, id: &(i64, i64), data: &UpdateInvitationDTO) -> Result<Invitation, Error> {
        let (ping_id, invitee_id) = *id;
        let result = sqlx::query(
            "UPDATE invitations SET status = ?, responded_at = ? WHERE ping_id = ? AND invitee_id = ?",
        )
        .bind(data.status)
        .bind(Utc::now())
        .bind(ping_id)
        .bind(invitee_id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        self.require(id).await
    }
}
