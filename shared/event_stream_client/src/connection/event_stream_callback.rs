use crate::{error::Error, event::ServerSentEvent};
use async_trait::async_trait;

///
/// Callback executed by the connection state machine.
///
/// Events are delivered one by one in the order they were received,
/// next event is not processed until previous call finishes.
///
#[async_trait]
pub trait EventStreamCallback: Send + Sync {
    async fn on_event(&self, event: ServerSentEvent);

    ///
    /// Executed whenever connection fails.
    /// Connection is recreated afterwards unless error is [Error::Unauthorized]
    ///
    async fn on_error(&self, error: &Error);
}
