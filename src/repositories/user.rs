//! UserRepository - persistence of user accounts

use super::{Create, Read, ReadMany};
use crate::dtos::CreateUserDTO;
use crate::domain::identity::SEARCH_LIMIT;
use crate::entities::User;
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Emails are unique and compared case-insensitively
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, email, name, password, timezone, created_at FROM users WHERE lower(email) = lower(?)",
        )
        .bind(email.trim())
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Users other than `exclude_id` whose name or email contains `needle`,
    /// best matches first: exact name or email, then name prefix, then
    /// substring; ties by name and id. At most [`SEARCH_LIMIT`] rows.
    pub async fn search_candidates(&self, needle: &str, exclude_id: i64) -> Result<Vec<User>, Error> {
        let needle = needle.trim().to_lowercase();
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, password, timezone, created_at
            FROM (
                SELECT *,
                    CASE
                        WHEN lower(name) = ?1 OR lower(email) = ?1 THEN 0
                        WHEN instr(lower(name), ?1) = 1 THEN 1
                        ELSE 2
                    END AS relevance
                FROM users
                WHERE user_id != ?2 AND (instr(lower(name), ?1) > 0 OR instr(lower(email), ?1) > 0)
            )
            ORDER BY relevance ASC, lower(name) ASC, user_id ASC
            LIMIT ?3
            "#,
        )
        .bind(&needle)
        .bind(exclude_id)
        .bind(SEARCH_LIMIT as i64)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (email, name, password, timezone, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.password)
        .bind(&data.timezone)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(User {
            user_id: result.last_insert_rowid(),
            email: data.email.clone(),
            name: data.name.clone(),
            password: data.password.clone(),
            timezone: data.timezone.clone(),
            created_at: now,
        })
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, email, name, password, timezone, created_at FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl ReadMany<User, i64> for UserRepository {
    async fn read_many(&self, ids: &[i64]) -> Result<Vec<User>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT user_id, email, name, password, timezone, created_at FROM users WHERE user_id IN (",
        );
        let mut separated = query_builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        query_builder
            .build_query_as::<User>()
            .fetch_all(&self.connection_pool)
            .await
    }
}
