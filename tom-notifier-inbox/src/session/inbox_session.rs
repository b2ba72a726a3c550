use super::{
    session_stream_callback::SessionStreamCallback, InboxCredentials, InboxSessionConfig,
};
use crate::{
    api::{NotificationsApiConfig, NotificationsApiImpl},
    error::Error,
    presentation::{InboxController, PlatformNotifier, PushNotificationsGate},
    store::NotificationStore,
    stream::{ConnectionHandle, NotificationsStreamConfig, NotificationsStreamManager},
};
use event_stream_client::EventStreamStatus;
use std::sync::Arc;
use tokio::sync::Mutex;

///
/// Inbox of the logged in user.
///
/// Created on login and closed on logout. Nothing is shared between sessions.
///
pub struct InboxSession {
    credentials: InboxCredentials,
    badge_limit: usize,

    store: NotificationStore,
    push_gate: Arc<PushNotificationsGate>,

    stream_manager: NotificationsStreamManager,
    stream_handle: Mutex<Option<ConnectionHandle>>,
}

impl InboxSession {
    ///
    /// Open notifications stream and load snapshot concurrently.
    ///
    /// Failed snapshot doesn't fail the session,
    /// it is visible as [crate::store::InboxStatus::Failed] and can be reloaded.
    ///
    /// ### Errors
    /// - [Error::InvalidUrl] when api url is invalid
    ///
    #[tracing::instrument(
        name = "Inbox Session",
        skip_all,
        fields(user_id = %credentials.user_id)
    )]
    pub async fn start(
        config: InboxSessionConfig,
        credentials: InboxCredentials,
        notifier: Arc<dyn PlatformNotifier>,
    ) -> Result<Self, Error> {
        tracing::info!("starting session");

        let client = reqwest::Client::new();

        let api_config = NotificationsApiConfig {
            base_url: config.api_base_url.clone(),
            token: credentials.token.clone(),
        };
        let api = Arc::new(NotificationsApiImpl::new(api_config, client.clone()));
        let store = NotificationStore::new(credentials.user_id.clone(), config.store, api);

        let stream_config = NotificationsStreamConfig {
            base_url: config.api_base_url,
            backoff: config.stream_backoff,
            deduplication_window: config.deduplication_window,
        };
        let stream_manager = NotificationsStreamManager::new(stream_config, client);

        let session = Self {
            credentials,
            badge_limit: config.badge_limit,
            store,
            push_gate: Arc::new(PushNotificationsGate::new(notifier)),
            stream_manager,
            stream_handle: Mutex::new(None),
        };

        let (stream_result, snapshot_result) =
            tokio::join!(session.connect_stream(), session.store.load_snapshot());
        stream_result?;
        if let Err(err) = snapshot_result {
            tracing::warn!(%err, "session started without snapshot");
        }

        tracing::info!("session started");

        Ok(session)
    }

    pub fn user_id(&self) -> &str {
        &self.credentials.user_id
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn controller(&self) -> InboxController {
        InboxController::new(self.store.clone(), Arc::clone(&self.push_gate))
            .with_badge_limit(self.badge_limit)
    }

    ///
    /// ### Errors
    /// Same as [NotificationStore::load_snapshot]
    ///
    pub async fn reload(&self) -> Result<(), Error> {
        self.store.load_snapshot().await
    }

    pub async fn stream_status(&self) -> Option<EventStreamStatus> {
        let handle = self.stream_handle.lock().await;
        handle.as_ref().map(|handle| *handle.status().borrow())
    }

    ///
    /// Open notifications stream unless it's already open.
    /// Stream stopped by rejected credentials is opened again.
    ///
    /// ### Errors
    /// - [Error::InvalidUrl] when stream url is invalid
    ///
    pub async fn connect_stream(&self) -> Result<(), Error> {
        let mut stream_handle = self.stream_handle.lock().await;

        if let Some(handle) = stream_handle.as_ref() {
            let status = *handle.status().borrow();
            if !matches!(
                status,
                EventStreamStatus::Unauthorized | EventStreamStatus::Closed
            ) {
                tracing::debug!(?status, "stream already connected");
                return Ok(());
            }
        }

        let callback = SessionStreamCallback::new(self.store.clone(), Arc::clone(&self.push_gate));
        let handle = self
            .stream_manager
            .subscribe(
                &self.credentials.user_id,
                &self.credentials.token,
                Arc::new(callback),
            )
            .await?;
        *stream_handle = Some(handle);

        Ok(())
    }

    ///
    /// Close notifications stream and cancel pending reconnection.
    /// Disconnecting disconnected stream does nothing
    ///
    pub async fn disconnect_stream(&self) {
        let handle = self.stream_handle.lock().await.take();
        if let Some(handle) = handle {
            self.stream_manager.unsubscribe(&handle).await;
        }
    }

    ///
    /// Close stream. Confirmations already in flight are left running
    ///
    #[tracing::instrument(name = "Inbox Session", skip_all, fields(user_id = %self.credentials.user_id))]
    pub async fn close(self) {
        tracing::info!("closing session");

        self.disconnect_stream().await;
        self.stream_manager.close().await;

        tracing::info!("session closed");
    }
}
