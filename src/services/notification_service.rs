use crate::error::Result;
use crate::models::notification::Notification;
use crate::store::ClubStore;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Outbound boundary for booking and status events. The production sink
/// writes rows the user polls through `NotificationService`; tests swap in
/// a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, user_id: Uuid, message: &str) -> Result<Notification>;
}

pub struct StoreNotificationSink {
    store: Arc<dyn ClubStore>,
}

impl StoreNotificationSink {
    pub fn new(store: Arc<dyn ClubStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationSink for StoreNotificationSink {
    async fn notify(&self, user_id: Uuid, message: &str) -> Result<Notification> {
        self.store.insert_notification(user_id, message).await
    }
}

/// User-facing side of notifications: listing and marking read. After
/// creation a notification belongs to its user, nothing else touches it.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn ClubStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn ClubStore>) -> Self {
        Self { store }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.store.list_notifications(user_id).await
    }

    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        self.store.mark_notification_read(id, user_id).await
    }
}
