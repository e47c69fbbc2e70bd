//! PingRepository - pings and the invitations they own

use super::{Create, Read};
use crate::dtos::CreatePingDTO;
use crate::entities::{InviteStatus, Ping};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const PING_COLUMNS: &str =
    "ping_id, creator_id, title, location, notes, starts_at, ics_secret, created_at";

pub struct PingRepository {
    connection_pool: SqlitePool,
}

impl PingRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Pings created by `user_id` or addressed to them, ordered by start time
    /// then id
    pub async fn find_for_user(&self, user_id: i64) -> Result<Vec<Ping>, Error> {
        let mut pings = sqlx::query_as::<_, Ping>(&format!(
            r#"
            SELECT {PING_COLUMNS}
            FROM pings
            WHERE creator_id = ?
               OR ping_id IN (SELECT ping_id FROM invitations WHERE invitee_id = ?)
            "#
        ))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        pings.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.ping_id.cmp(&b.ping_id)));
        Ok(pings)
    }
}

impl Create<Ping, CreatePingDTO> for PingRepository {
    /// Inserts the ping and one pending invitation per invitee, in invitee
    /// order, inside a single transaction.
    async fn create(&self, data: &CreatePingDTO) -> Result<Ping, Error> {
        let now = Utc::now();
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO pings (creator_id, title, location, notes, starts_at, ics_secret, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.creator_id)
        .bind(&data.ping.title)
        .bind(&data.ping.location)
        .bind(&data.ping.notes)
        .bind(data.ping.starts_at)
        .bind(&data.ics_secret)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let ping_id = result.last_insert_rowid();

        for invitee_id in &data.ping.invitee_ids {
            sqlx::query("INSERT INTO invitations (ping_id, invitee_id, status) VALUES (?, ?, ?)")
                .bind(ping_id)
                .bind(invitee_id)
                .bind(InviteStatus::Pending)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Ping {
            ping_id,
            creator_id: data.creator_id,
            title: data.ping.title.clone(),
            location: data.ping.location.clone(),
            notes: data.ping.notes.clone(),
            starts_at: data.ping.starts_at,
            ics_secret: data.ics_secret.clone(),
            created_at: now,
        })
    }
}

impl Read<Ping, i64> for PingRepository {
    async fn read(&self, id: &i64) -> Result<Option<Ping>, Error> {
        sqlx::query_as::<_, Ping>(&format!("SELECT {PING_COLUMNS} FROM pings WHERE ping_id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
