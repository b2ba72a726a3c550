use crate::{
    dto::NotificationRecord,
    error::Error,
    presentation::PushNotificationsGate,
    store::{NotificationStore, PushOutcome},
    stream::NotificationsStreamCallback,
};
use async_trait::async_trait;
use std::sync::Arc;

pub struct SessionStreamCallback {
    store: NotificationStore,
    push_gate: Arc<PushNotificationsGate>,
}

impl SessionStreamCallback {
    pub fn new(store: NotificationStore, push_gate: Arc<PushNotificationsGate>) -> Self {
        Self { store, push_gate }
    }
}

#[async_trait]
impl NotificationsStreamCallback for SessionStreamCallback {
    async fn on_notification(&self, record: NotificationRecord) {
        let outcome = self.store.apply_pushed_event(record.clone());

        if outcome == PushOutcome::Inserted && !record.is_read {
            self.push_gate.notify(&record).await;
        }
    }

    async fn on_error(&self, error: &Error) {
        if error.is_unauthorized() {
            tracing::error!("notifications stream rejected credentials");
            self.store.mark_unauthorized();
        }
    }
}
