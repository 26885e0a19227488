use crate::models::{
    AdminDashboardStats, InboxCounts, InboxEntry, Message, SendMessageRequest, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for all persistence operations. Handlers and extractors only see
/// `Arc<dyn Repository>`, so tests swap in an in-memory implementation.
///
/// Implementations swallow database errors: they log them and return an empty or
/// negative result, which handlers map to a status code.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn create_user(&self, user: User) -> Option<User>;

    // --- Messaging ---
    // Received messages for `user_id`, newest first.
    async fn get_inbox(&self, user_id: Uuid, limit: i64) -> Vec<InboxEntry>;
    async fn get_inbox_counts(&self, user_id: Uuid) -> InboxCounts;
    async fn send_message(&self, sender_id: Uuid, req: SendMessageRequest) -> Option<Message>;
    // Recipient-only: returns false if the message does not exist or belongs to someone else.
    async fn mark_message_read(&self, message_id: Uuid, user_id: Uuid) -> bool;

    // --- Admin ---
    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL. Expects the `profiles` and `messages` tables.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("count query failed: {:?}", e);
                0
            })
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    /// Mirrors an identity-provider account into `profiles`.
    async fn create_user(&self, user: User) -> Option<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3) RETURNING id, email, role",
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_user error: {:?}", e))
        .ok()
    }

    async fn get_inbox(&self, user_id: Uuid, limit: i64) -> Vec<InboxEntry> {
        let query = r#"
            SELECT
                m.id,
                m.sender_id,
                p.email AS sender_email,
                m.subject,
                m.body,
                m.is_read,
                m.created_at
            FROM messages m
            JOIN profiles p ON m.sender_id = p.id
            WHERE m.recipient_id = $1
            ORDER BY m.created_at DESC
            LIMIT $2
        "#;

        sqlx::query_as::<_, InboxEntry>(query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_inbox error: {:?}", e);
                vec![]
            })
    }

    /// All three counters in one round trip.
    async fn get_inbox_counts(&self, user_id: Uuid) -> InboxCounts {
        let query = r#"
            SELECT
                COUNT(*) FILTER (WHERE recipient_id = $1) AS received,
                COUNT(*) FILTER (WHERE recipient_id = $1 AND is_read = false) AS unread,
                COUNT(*) FILTER (WHERE sender_id = $1) AS sent
            FROM messages
            WHERE recipient_id = $1 OR sender_id = $1
        "#;

        match sqlx::query_as::<_, (i64, i64, i64)>(query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
        {
            Ok((received, unread, sent)) => InboxCounts {
                received,
                unread,
                sent,
            },
            Err(e) => {
                tracing::error!("get_inbox_counts error: {:?}", e);
                InboxCounts::default()
            }
        }
    }

    async fn send_message(&self, sender_id: Uuid, req: SendMessageRequest) -> Option<Message> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, subject, body, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, false, NOW())
            RETURNING id, sender_id, recipient_id, subject, body, is_read, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sender_id)
        .bind(req.recipient_id)
        .bind(req.subject)
        .bind(req.body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("send_message error: {:?}", e))
        .ok()
    }

    async fn mark_message_read(&self, message_id: Uuid, user_id: Uuid) -> bool {
        let result =
            sqlx::query("UPDATE messages SET is_read = true WHERE id = $1 AND recipient_id = $2")
                .bind(message_id)
                .bind(user_id)
                .execute(&self.pool)
                .await;

        match result {
            Ok(r) => r.rows_affected() > 0,
            Err(e) => {
                tracing::error!("Failed to mark message read: {:?}", e);
                false
            }
        }
    }

    async fn get_stats(&self) -> AdminDashboardStats {
        AdminDashboardStats {
            total_users: self.count("SELECT COUNT(*) FROM profiles").await,
            total_candidates: self
                .count("SELECT COUNT(*) FROM profiles WHERE role = 'candidate'")
                .await,
            total_employers: self
                .count("SELECT COUNT(*) FROM profiles WHERE role = 'employer'")
                .await,
            total_messages: self.count("SELECT COUNT(*) FROM messages").await,
            unread_messages: self
                .count("SELECT COUNT(*) FROM messages WHERE is_read = false")
                .await,
        }
    }
}
