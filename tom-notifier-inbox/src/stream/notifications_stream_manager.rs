use super::{
    notifications_event_callback::NotificationsEventCallback, ConnectionHandle,
    NotificationsStreamCallback, NotificationsStreamConfig,
};
use crate::{api::endpoint_url, error::Error};
use event_stream_client::{EventStreamConfig, EventStreamConnection};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

const TOKEN_QUERY_PARAM: &str = "token";

///
/// Owner of notifications streams. Keeps at most one stream per user.
///
/// Streams are closed when manager is closed or dropped.
///
pub struct NotificationsStreamManager {
    config: NotificationsStreamConfig,
    client: reqwest::Client,

    connections: Mutex<HashMap<String, ConnectionHandle>>,
}

impl NotificationsStreamManager {
    pub fn new(config: NotificationsStreamConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            connections: Mutex::new(HashMap::new()),
        }
    }

    ///
    /// Open notifications stream of the user.
    /// Stream previously opened for the same user is closed first.
    ///
    /// ### Errors
    /// - [Error::InvalidUrl] when stream url can't be built
    ///
    #[tracing::instrument(
        name = "Notifications Stream Manager",
        skip_all,
        fields(user_id = %user_id)
    )]
    pub async fn subscribe(
        &self,
        user_id: &str,
        token: &str,
        callback: Arc<dyn NotificationsStreamCallback>,
    ) -> Result<ConnectionHandle, Error> {
        let url = endpoint_url(&self.config.base_url, &["notifications", "subscribe", user_id])?;
        let config = EventStreamConfig {
            url: url.to_string(),
            query: vec![(TOKEN_QUERY_PARAM.to_string(), token.to_string())],
            backoff: self.config.backoff.clone(),
        };

        let mut connections = self.connections.lock().await;
        if let Some(previous) = connections.remove(user_id) {
            tracing::info!("closing previous stream");
            previous.close().await;
        }

        let callback = NotificationsEventCallback::new(
            user_id.to_string(),
            self.config.deduplication_window,
            callback,
        );
        let connection = EventStreamConnection::open(config, self.client.clone(), callback);
        let handle = ConnectionHandle::new(user_id.to_string(), connection);
        connections.insert(user_id.to_string(), handle.clone());

        tracing::info!("subscribed");

        Ok(handle)
    }

    ///
    /// Close the stream. Unsubscribing closed stream does nothing.
    ///
    #[tracing::instrument(
        name = "Notifications Stream Manager",
        skip_all,
        fields(user_id = %handle.user_id())
    )]
    pub async fn unsubscribe(&self, handle: &ConnectionHandle) {
        {
            let mut connections = self.connections.lock().await;
            let is_current = connections
                .get(handle.user_id())
                .is_some_and(|current| current.is_same(handle));
            if is_current {
                connections.remove(handle.user_id());
            }
        }

        handle.close().await;
        tracing::info!("unsubscribed");
    }

    pub async fn is_subscribed(&self, user_id: &str) -> bool {
        self.connections.lock().await.contains_key(user_id)
    }

    ///
    /// Close all streams
    ///
    #[tracing::instrument(name = "Notifications Stream Manager", skip_all)]
    pub async fn close(&self) {
        let connections = std::mem::take(&mut *self.connections.lock().await);

        tracing::info!(streams = connections.len(), "closing streams");
        for handle in connections.into_values() {
            handle.close().await;
        }
    }
}
