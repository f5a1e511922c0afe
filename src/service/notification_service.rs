// services/notification_service.rs
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    db::notificationdb::NotificationExt,
    db::userdb::UserExt,
    models::notificationmodel::{Notification, NotificationRequest},
    service::error::ServiceError,
};

/// Fan-out point for live subscribers. A websocket or SSE layer attaches by
/// calling `subscribe`; without one, publishes fall on the floor, which is
/// fine because every notification is persisted first.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    channels: Arc<tokio::sync::RwLock<HashMap<Uuid, broadcast::Sender<Notification>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }

    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<Notification> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(64).0)
            .subscribe()
    }

    pub async fn publish(&self, notification: &Notification) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&notification.user_id) {
            if sender.send(notification.clone()).is_err() {
                // last receiver hung up, drop the channel
                channels.remove(&notification.user_id);
            }
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

/// The workflow-facing sink. `enqueue` is synchronous and cannot fail, so a
/// bid accept or a review never waits on, or breaks because of, notification
/// plumbing. The paired dispatcher drains the queue on its own task.
#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
    sender: mpsc::UnboundedSender<NotificationRequest>,
    hub: NotificationHub,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> (Self, NotificationDispatcher) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let hub = NotificationHub::new();

        let service = Self {
            db_client: db_client.clone(),
            sender,
            hub: hub.clone(),
        };

        let dispatcher = NotificationDispatcher {
            db_client,
            receiver,
            hub,
            idle_sleep: Duration::from_millis(200),
        };

        (service, dispatcher)
    }

    pub fn enqueue(&self, request: NotificationRequest) {
        if self.sender.send(request).is_err() {
            tracing::warn!("NotificationService: dispatcher is gone, dropping notification");
        }
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    pub async fn get_user_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), ServiceError> {
        self.db_client
            .get_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        let notifications = self
            .db_client
            .get_notifications_for_user(user_id, unread_only, limit, offset)
            .await?;
        let total = self
            .db_client
            .count_notifications_for_user(user_id, unread_only)
            .await?;

        Ok((notifications, total))
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        self.db_client
            .get_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        Ok(self
            .db_client
            .count_notifications_for_user(user_id, true)
            .await?)
    }

    pub async fn mark_read(&self, notification_id: Uuid) -> Result<Notification, ServiceError> {
        self.db_client
            .mark_notification_read(notification_id)
            .await?
            .ok_or(ServiceError::NotificationNotFound(notification_id))
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        self.db_client
            .get_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        Ok(self.db_client.mark_all_notifications_read(user_id).await?)
    }
}

/// Drains the queue, persists each request and fans it out to the hub.
/// Persistence failures are logged and dropped here, they never travel back
/// to the transition that raised the notification.
pub struct NotificationDispatcher {
    db_client: Arc<DBClient>,
    receiver: mpsc::UnboundedReceiver<NotificationRequest>,
    hub: NotificationHub,
    pub idle_sleep: Duration,
}

impl NotificationDispatcher {
    /// Run the dispatcher loop until the provided shutdown signal triggers.
    pub async fn run_forever(mut self, shutdown: impl std::future::Future<Output = ()>) {
        let mut shutdown = Box::pin(shutdown);

        loop {
            // Check shutdown first
            if futures::future::poll_immediate(&mut shutdown).await.is_some() {
                tracing::info!("NotificationDispatcher: shutdown requested, exiting loop");
                break;
            }

            match self.receiver.try_recv() {
                Ok(request) => self.deliver(request).await,
                Err(mpsc::error::TryRecvError::Empty) => sleep(self.idle_sleep).await,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    tracing::info!("NotificationDispatcher: all producers dropped, exiting loop");
                    break;
                }
            }
        }

        // Flush whatever was already queued when the shutdown landed
        while let Ok(request) = self.receiver.try_recv() {
            self.deliver(request).await;
        }

        tracing::info!("NotificationDispatcher: stopped");
    }

    async fn deliver(&self, request: NotificationRequest) {
        match self.db_client.save_notification(&request).await {
            Ok(notification) => {
                tracing::info!(
                    "NotificationDispatcher: stored {} notification {} for user {}",
                    notification.notification_type,
                    notification.id,
                    notification.user_id
                );
                self.hub.publish(&notification).await;
            }
            Err(e) => {
                tracing::error!(
                    "NotificationDispatcher: failed to store {} notification for user {}: {}",
                    request.notification_type,
                    request.user_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notificationmodel::NotificationPriority;
    use sqlx::PgPool;

    fn request_for(user_id: Uuid, title: &str) -> NotificationRequest {
        NotificationRequest {
            user_id,
            notification_type: "bid_received".to_string(),
            title: title.to_string(),
            message: "A bid came in".to_string(),
            related_id: None,
            related_type: None,
            priority: NotificationPriority::Normal,
            action_url: None,
        }
    }

    #[tokio::test]
    async fn enqueue_is_synchronous_and_ordered() {
        let pool = PgPool::connect_lazy("postgres://localhost/buildbid").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let (service, mut dispatcher) = NotificationService::new(db_client);

        let user_id = Uuid::new_v4();
        service.enqueue(request_for(user_id, "first"));
        service.enqueue(request_for(user_id, "second"));

        let first = dispatcher.receiver.try_recv().unwrap();
        let second = dispatcher.receiver.try_recv().unwrap();
        assert_eq!(first.title, "first");
        assert_eq!(second.title, "second");
        assert!(dispatcher.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn hub_fans_out_to_subscribers() {
        let hub = NotificationHub::new();
        let user_id = Uuid::new_v4();
        let mut receiver = hub.subscribe(user_id).await;

        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            notification_type: "payment_created".to_string(),
            title: "Payment created".to_string(),
            message: "A payment of 10000.00 has been created for you".to_string(),
            related_id: None,
            related_type: None,
            priority: NotificationPriority::High,
            action_url: None,
            is_read: false,
            created_at: None,
        };

        hub.publish(&notification).await;

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.id, notification.id);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let hub = NotificationHub::new();
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            notification_type: "bid_accepted".to_string(),
            title: "Bid accepted".to_string(),
            message: "Your bid was accepted".to_string(),
            related_id: None,
            related_type: None,
            priority: NotificationPriority::High,
            action_url: None,
            is_read: false,
            created_at: None,
        };

        // must not panic or block
        hub.publish(&notification).await;
    }
}
