pub mod connection;
pub mod error;
pub mod event;
pub mod retry;

pub use connection::{
    EventStreamCallback, EventStreamConfig, EventStreamConnection, EventStreamStatus,
};
pub use error::Error;
pub use event::{EventParser, ServerSentEvent};
pub use retry::{Backoff, BackoffConfig};
