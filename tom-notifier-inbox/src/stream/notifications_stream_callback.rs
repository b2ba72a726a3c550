use crate::{dto::NotificationRecord, error::Error};
use async_trait::async_trait;

///
/// Receiver of the notifications stream.
///
/// Every notification is delivered at most once per stream.
///
#[async_trait]
pub trait NotificationsStreamCallback: Send + Sync {
    async fn on_notification(&self, record: NotificationRecord);

    ///
    /// Executed whenever stream fails.
    /// Stream is reopened afterwards unless error is [Error::Unauthorized]
    ///
    async fn on_error(&self, error: &Error);
}
