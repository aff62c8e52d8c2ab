use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{AppendedMessage, ConversationRepository, RepositoryError};
use crate::domain::{
    Conversation, ConversationId, ConversationKey, Message, MessageId, MessageKind,
    ParticipantId, ProductId,
};

const CONVERSATION_COLUMNS: &str =
    "id, customer_id, vendor_id, product_id, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, kind, payload, created_at, is_read";

pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self, conversation), fields(conversation_id = %conversation.id))]
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO conversations ({CONVERSATION_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ON CONSTRAINT conversations_dedup_key DO NOTHING
            RETURNING {CONVERSATION_COLUMNS}
            "#
        );

        let inserted = sqlx::query(&query)
            .bind(conversation.id.as_uuid())
            .bind(conversation.customer_id.as_uuid())
            .bind(conversation.vendor_id.as_uuid())
            .bind(conversation.product_id.map(|p| p.as_uuid()))
            .bind(conversation.created_at)
            .bind(conversation.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if let Some(row) = inserted {
            return conversation_from_row(&row);
        }

        // Another writer holds the key; hand back its row.
        self.find_by_key(&conversation.key()).await?.ok_or_else(|| {
            RepositoryError::ConstraintViolation(format!(
                "conversation key conflict for {} without a visible row",
                conversation.id
            ))
        })
    }

    #[instrument(skip(self, key), fields(customer_id = %key.customer_id, vendor_id = %key.vendor_id))]
    async fn find_by_key(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {CONVERSATION_COLUMNS}
            FROM conversations
            WHERE customer_id = $1
              AND vendor_id = $2
              AND product_id IS NOT DISTINCT FROM $3
            "#
        );

        sqlx::query(&query)
            .bind(key.customer_id.as_uuid())
            .bind(key.vendor_id.as_uuid())
            .bind(key.product_id.map(|p| p.as_uuid()))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(|row| conversation_from_row(&row))
            .transpose()
    }

    #[instrument(skip(self), fields(conversation_id = %id))]
    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let query = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1");

        sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(|row| conversation_from_row(&row))
            .transpose()
    }

    #[instrument(skip(self), fields(participant_id = %participant))]
    async fn list_for_participant(
        &self,
        participant: ParticipantId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {CONVERSATION_COLUMNS}
            FROM conversations
            WHERE customer_id = $1 OR vendor_id = $1
            ORDER BY updated_at DESC, created_at DESC
            "#
        );

        let rows = sqlx::query(&query)
            .bind(participant.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(conversation_from_row).collect()
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, conversation_id = %message.conversation_id))]
    async fn append_message(&self, message: &Message) -> Result<AppendedMessage, RepositoryError> {
        let conversation_id = message.conversation_id.as_uuid();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Row lock serializes sends per conversation, so commit order and
        // created_at order agree.
        let locked = sqlx::query("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
            .bind(conversation_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound(message.conversation_id.to_string()));
        }

        let latest: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(created_at) FROM messages WHERE conversation_id = $1")
                .bind(conversation_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        let created_at = latest.map_or(message.created_at, |l| l.max(message.created_at));

        let insert = format!(
            r#"
            INSERT INTO messages ({MESSAGE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        let message_row = sqlx::query(&insert)
            .bind(message.id.as_uuid())
            .bind(conversation_id)
            .bind(message.sender_id.as_uuid())
            .bind(message.kind.as_str())
            .bind(&message.payload)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let touch = format!(
            r#"
            UPDATE conversations
            SET updated_at = GREATEST(updated_at, $1)
            WHERE id = $2
            RETURNING {CONVERSATION_COLUMNS}
            "#
        );
        let conversation_row = sqlx::query(&touch)
            .bind(created_at)
            .bind(conversation_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(AppendedMessage {
            message: message_from_row(&message_row)?,
            conversation: conversation_from_row(&conversation_row)?,
        })
    }

    #[instrument(skip(self), fields(message_id = %id))]
    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");

        sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(|row| message_from_row(&row))
            .transpose()
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id, limit = %limit))]
    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT $2
            "#
        );

        let rows = sqlx::query(&query)
            .bind(conversation_id.as_uuid())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut messages = rows
            .iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        messages.reverse();
        Ok(messages)
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id))]
    async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Option<Message>, RepositoryError> {
        Ok(self.get_messages(conversation_id, 1).await?.pop())
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id, viewer_id = %viewer))]
    async fn mark_read(
        &self,
        conversation_id: ConversationId,
        viewer: ParticipantId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE conversation_id = $1 AND sender_id <> $2 AND NOT is_read
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(viewer.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(message_id = %message_id, viewer_id = %viewer))]
    async fn mark_message_read(
        &self,
        message_id: MessageId,
        viewer: ParticipantId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE id = $1 AND sender_id <> $2 AND NOT is_read
            "#,
        )
        .bind(message_id.as_uuid())
        .bind(viewer.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id, viewer_id = %viewer))]
    async fn count_unread(
        &self,
        conversation_id: ConversationId,
        viewer: ParticipantId,
    ) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE conversation_id = $1 AND sender_id <> $2 AND NOT is_read
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(viewer.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count as u64)
    }

    #[instrument(skip(self), fields(viewer_id = %viewer))]
    async fn count_unread_total(&self, viewer: ParticipantId) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE (c.customer_id = $1 OR c.vendor_id = $1)
              AND m.sender_id <> $1
              AND NOT m.is_read
            "#,
        )
        .bind(viewer.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count as u64)
    }
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::ConnectionFailed(e.to_string())
        }
        sqlx::Error::Database(db) if db.is_check_violation() || db.is_unique_violation() => {
            RepositoryError::ConstraintViolation(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::NotFound(db.message().to_string())
        }
        _ => RepositoryError::QueryFailed(e.to_string()),
    }
}

fn corrupt(e: sqlx::Error) -> RepositoryError {
    RepositoryError::CorruptRow(e.to_string())
}

fn conversation_from_row(row: &PgRow) -> Result<Conversation, RepositoryError> {
    let product_id: Option<Uuid> = row.try_get("product_id").map_err(corrupt)?;

    Ok(Conversation {
        id: ConversationId::from_uuid(row.try_get("id").map_err(corrupt)?),
        customer_id: ParticipantId::from_uuid(row.try_get("customer_id").map_err(corrupt)?),
        vendor_id: ParticipantId::from_uuid(row.try_get("vendor_id").map_err(corrupt)?),
        product_id: product_id.map(ProductId::from_uuid),
        created_at: row.try_get("created_at").map_err(corrupt)?,
        updated_at: row.try_get("updated_at").map_err(corrupt)?,
    })
}

fn message_from_row(row: &PgRow) -> Result<Message, RepositoryError> {
    let kind: String = row.try_get("kind").map_err(corrupt)?;
    let kind = kind
        .parse::<MessageKind>()
        .map_err(RepositoryError::CorruptRow)?;

    Ok(Message {
        id: MessageId::from_uuid(row.try_get("id").map_err(corrupt)?),
        conversation_id: ConversationId::from_uuid(row.try_get("conversation_id").map_err(corrupt)?),
        sender_id: ParticipantId::from_uuid(row.try_get("sender_id").map_err(corrupt)?),
        kind,
        payload: row.try_get("payload").map_err(corrupt)?,
        created_at: row.try_get("created_at").map_err(corrupt)?,
        is_read: row.try_get("is_read").map_err(corrupt)?,
    })
}
