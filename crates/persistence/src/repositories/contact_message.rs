//! Contact message repository for database operations.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use domain::models::MessageStats;

use crate::entities::ContactMessageEntity;
use crate::metrics::QueryTimer;

/// Repository for contact message database operations.
#[derive(Clone)]
pub struct ContactMessageRepository {
    pool: PgPool,
}

impl ContactMessageRepository {
    /// Creates a new ContactMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a message submitted through the public contact form.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        body: &str,
    ) -> Result<ContactMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_contact_message");
        let result = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            INSERT INTO contact_messages (name, email, subject, body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Inbox listing, newest first. Status filters to read or unread;
    /// None returns everything.
    pub async fn list(
        &self,
        read_filter: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_contact_messages");
        let result = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            SELECT * FROM contact_messages
            WHERE ($1::BOOLEAN IS NULL OR is_read = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(read_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count messages matching the inbox filter.
    pub async fn count(&self, read_filter: Option<bool>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_contact_messages");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM contact_messages
            WHERE ($1::BOOLEAN IS NULL OR is_read = $1)
            "#,
        )
        .bind(read_filter)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Read/unread breakdown for the inbox header.
    pub async fn stats(&self) -> Result<MessageStats, sqlx::Error> {
        let timer = QueryTimer::new("contact_message_stats");
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE is_read = true) as read,
                COUNT(*) FILTER (WHERE is_read = false) as unread
            FROM contact_messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(MessageStats {
            total: row.get("total"),
            read: row.get("read"),
            unread: row.get("unread"),
        })
    }

    /// Mark a message read. Returns None when it does not exist.
    pub async fn mark_read(
        &self,
        id: Uuid,
    ) -> Result<Option<ContactMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_contact_message_read");
        let result = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            UPDATE contact_messages SET is_read = true WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a message.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_contact_message");
        let result = sqlx::query(
            r#"
            DELETE FROM contact_messages WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repository_creation() {
        // Actual database tests are integration tests
    }
}
