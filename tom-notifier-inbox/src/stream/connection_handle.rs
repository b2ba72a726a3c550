use event_stream_client::{EventStreamConnection, EventStreamStatus};
use std::sync::Arc;
use tokio::sync::watch;

///
/// Handle of the notifications stream opened for a user.
/// Clones refer to the same stream.
///
#[derive(Clone)]
pub struct ConnectionHandle {
    user_id: String,
    connection: Arc<EventStreamConnection>,
}

impl ConnectionHandle {
    pub(super) fn new(user_id: String, connection: EventStreamConnection) -> Self {
        Self {
            user_id,
            connection: Arc::new(connection),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn status(&self) -> watch::Receiver<EventStreamStatus> {
        self.connection.status()
    }

    pub fn is_same(&self, other: &ConnectionHandle) -> bool {
        Arc::ptr_eq(&self.connection, &other.connection)
    }

    ///
    /// Close stream and cancel pending reconnection.
    /// Closing already closed stream does nothing
    ///
    pub(super) async fn close(&self) {
        self.connection.close().await;
    }
}
