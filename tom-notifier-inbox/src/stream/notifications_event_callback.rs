use super::{NotificationsDeduplication, NotificationsStreamCallback};
use crate::{dto::NotificationRecord, error::Error};
use async_trait::async_trait;
use event_stream_client::{EventStreamCallback, ServerSentEvent};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const NOTIFICATION_EVENT_TYPE: &str = "notification";

///
/// Translates raw server-sent events of one user stream into notifications
///
pub struct NotificationsEventCallback {
    user_id: String,
    deduplication: Mutex<NotificationsDeduplication>,
    callback: Arc<dyn NotificationsStreamCallback>,
}

impl NotificationsEventCallback {
    pub fn new(
        user_id: String,
        deduplication_window: usize,
        callback: Arc<dyn NotificationsStreamCallback>,
    ) -> Self {
        Self {
            user_id,
            deduplication: Mutex::new(NotificationsDeduplication::new(deduplication_window)),
            callback,
        }
    }
}

#[async_trait]
impl EventStreamCallback for NotificationsEventCallback {
    #[tracing::instrument(
        name = "Notifications Stream",
        skip_all,
        fields(
            user_id = %self.user_id,
            event = %event.event,
            event_id = ?event.id,
        )
    )]
    async fn on_event(&self, event: ServerSentEvent) {
        if event.event != NOTIFICATION_EVENT_TYPE {
            tracing::trace!("ignored event");
            return;
        }

        let record = match serde_json::from_str::<NotificationRecord>(&event.data) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(%err, "dropped malformed notification");
                return;
            }
        };

        if record.owner_id != self.user_id {
            tracing::warn!(
                id = %record.id,
                owner_id = %record.owner_id,
                "dropped notification of another user"
            );
            return;
        }

        if !self
            .deduplication
            .lock()
            .await
            .deduplicate(&record.id, record.is_read)
        {
            tracing::debug!(id = %record.id, "dropped duplicated notification");
            return;
        }

        tracing::debug!(id = %record.id, "received notification");
        self.callback.on_notification(record).await;
    }

    async fn on_error(&self, error: &event_stream_client::Error) {
        let error = Error::from(error);
        tracing::warn!(user_id = %self.user_id, %error, "notifications stream failed");

        self.callback.on_error(&error).await;
    }
}
