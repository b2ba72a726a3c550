use super::{endpoint_url, NotificationsApi, NotificationsApiConfig};
use crate::{
    dto::{NotificationRecord, UnreadCount},
    error::Error,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

pub struct NotificationsApiImpl {
    config: NotificationsApiConfig,
    client: Client,
}

impl NotificationsApiImpl {
    pub fn new(config: NotificationsApiConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        endpoint_url(&self.config.base_url, segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.bearer_auth(&self.config.token).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            status if !status.is_success() => Err(Error::UnexpectedStatus(status.as_u16())),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl NotificationsApi for NotificationsApiImpl {
    #[tracing::instrument(name = "Notifications API", skip_all, fields(user_id = %user_id))]
    async fn fetch_notifications(&self, user_id: &str) -> Result<Vec<NotificationRecord>, Error> {
        tracing::debug!("fetching notifications");

        let url = self.url(&["notifications", "user", user_id])?;
        let notifications = self
            .send(self.client.get(url))
            .await?
            .json::<Vec<NotificationRecord>>()
            .await?;

        tracing::debug!(count = notifications.len(), "fetched notifications");

        Ok(notifications)
    }

    #[tracing::instrument(name = "Notifications API", skip_all, fields(user_id = %user_id))]
    async fn fetch_unread_notifications(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotificationRecord>, Error> {
        tracing::debug!("fetching unread notifications");

        let url = self.url(&["notifications", "user", user_id, "unread"])?;
        let notifications = self
            .send(self.client.get(url))
            .await?
            .json::<Vec<NotificationRecord>>()
            .await?;

        tracing::debug!(count = notifications.len(), "fetched unread notifications");

        Ok(notifications)
    }

    #[tracing::instrument(name = "Notifications API", skip_all, fields(user_id = %user_id))]
    async fn fetch_unread_count(&self, user_id: &str) -> Result<usize, Error> {
        tracing::debug!("fetching unread count");

        let url = self.url(&["notifications", "user", user_id, "unread", "count"])?;
        let count = self
            .send(self.client.get(url))
            .await?
            .json::<UnreadCount>()
            .await?
            .value();

        tracing::debug!(count, "fetched unread count");

        Ok(count)
    }

    #[tracing::instrument(name = "Notifications API", skip_all, fields(id = %id))]
    async fn mark_read(&self, id: &str) -> Result<(), Error> {
        tracing::debug!("marking notification read");

        let url = self.url(&["notifications", id, "read"])?;
        self.send(self.client.put(url)).await?;

        Ok(())
    }

    #[tracing::instrument(name = "Notifications API", skip_all, fields(user_id = %user_id))]
    async fn mark_all_read(&self, user_id: &str) -> Result<(), Error> {
        tracing::debug!("marking all notifications read");

        let url = self.url(&["notifications", "user", user_id, "read-all"])?;
        self.send(self.client.put(url)).await?;

        Ok(())
    }

    #[tracing::instrument(name = "Notifications API", skip_all, fields(user_id = %user_id))]
    async fn clear_all(&self, user_id: &str) -> Result<(), Error> {
        tracing::debug!("clearing notifications");

        let url = self.url(&["notifications", "user", user_id])?;
        self.send(self.client.delete(url)).await?;

        Ok(())
    }
}
