use super::{
    state_machine::StateMachine, EventStreamCallback, EventStreamConfig, EventStreamStatus,
};
use std::sync::Arc;
use tokio::{
    sync::{watch, Mutex, Notify},
    task::JoinHandle,
};

///
/// Server-sent events connection.
/// It runs background task that recreates connection whenever it fails.
///
/// Current state of the connection can be accessed by [Self::status].
///
pub struct EventStreamConnection {
    status_rx: watch::Receiver<EventStreamStatus>,

    task_handle: Mutex<Option<JoinHandle<()>>>,
    close_notify: Arc<Notify>,
}

impl EventStreamConnection {
    ///
    /// Start background task that opens connection.
    /// Failures are reported through callback and never returned.
    ///
    #[tracing::instrument(
        name = "Event Stream Connection",
        target = "event_stream_client::connection",
        skip_all,
        fields(url = %config.url)
    )]
    pub fn open<Callback>(
        config: EventStreamConfig,
        client: reqwest::Client,
        callback: Callback,
    ) -> Self
    where
        Callback: EventStreamCallback + 'static,
    {
        tracing::info!("starting state machine");
        let (status_tx, status_rx) = watch::channel(EventStreamStatus::Connecting);
        let state_machine = StateMachine::new(config, client, callback, status_tx);

        let close_notify = Arc::new(Notify::new());
        let close_notify_clone = Arc::clone(&close_notify);
        let task_handle = tokio::spawn(async move {
            state_machine.run(close_notify_clone).await;
        });

        Self {
            status_rx,
            task_handle: Mutex::new(Some(task_handle)),
            close_notify,
        }
    }

    ///
    /// Close underlying connection and task that recreates it.
    /// Closing already closed connection does nothing.
    ///
    #[tracing::instrument(
        name = "Event Stream Connection",
        target = "event_stream_client::connection",
        skip_all
    )]
    pub async fn close(&self) {
        let Some(task_handle) = self.task_handle.lock().await.take() else {
            tracing::debug!("connection already closed");
            return;
        };

        tracing::info!("closing connection");
        self.close_notify.notify_one();

        match task_handle.await {
            Ok(()) => tracing::info!("connection closed"),
            Err(err) => tracing::error!(%err, "connection task failed"),
        }
    }

    pub fn status(&self) -> watch::Receiver<EventStreamStatus> {
        self.status_rx.clone()
    }
}

impl Drop for EventStreamConnection {
    fn drop(&mut self) {
        // Stops the task when connection is dropped without closing.
        // Permit is stored, so it works even if task is not waiting yet
        self.close_notify.notify_one();
    }
}
