// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{Notification, NotificationRequest};

const NOTIFICATION_COLUMNS: &str = "id, user_id, notification_type, title, message, related_id, \
     related_type, priority, action_url, is_read, created_at";

#[async_trait]
pub trait NotificationExt {
    async fn save_notification(&self, request: &NotificationRequest) -> Result<Notification, Error>;

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error>;

    async fn count_notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, Error>;

    async fn mark_notification_read(&self, notification_id: Uuid) -> Result<Option<Notification>, Error>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn save_notification(&self, request: &NotificationRequest) -> Result<Notification, Error> {
        let query = format!(
            r#"
            INSERT INTO notifications
                (user_id, notification_type, title, message, related_id, related_type,
                 priority, action_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );

        sqlx::query_as::<_, Notification>(&query)
            .bind(request.user_id)
            .bind(&request.notification_type)
            .bind(&request.title)
            .bind(&request.message)
            .bind(request.related_id)
            .bind(&request.related_type)
            .bind(request.priority)
            .bind(&request.action_url)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error> {
        let query = format!(
            r#"
            SELECT {} FROM notifications
            WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            NOTIFICATION_COLUMNS
        );

        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn count_notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_notification_read(&self, notification_id: Uuid) -> Result<Option<Notification>, Error> {
        let query = format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING {}",
            NOTIFICATION_COLUMNS
        );

        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
