use crate::{dto::NotificationRecord, error::Error};
use async_trait::async_trait;

///
/// Client of the notifications REST API.
///
/// Every function returns [Error::Unauthorized] when server responds with 401,
/// so it can be told apart from network failures.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    ///
    /// ### Returns
    /// All notifications of the user, most recent first
    ///
    async fn fetch_notifications(&self, user_id: &str) -> Result<Vec<NotificationRecord>, Error>;

    async fn fetch_unread_notifications(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotificationRecord>, Error>;

    async fn fetch_unread_count(&self, user_id: &str) -> Result<usize, Error>;

    async fn mark_read(&self, id: &str) -> Result<(), Error>;

    async fn mark_all_read(&self, user_id: &str) -> Result<(), Error>;

    ///
    /// Delete all notifications of the user
    ///
    async fn clear_all(&self, user_id: &str) -> Result<(), Error>;
}
