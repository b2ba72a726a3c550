//!
//! Module that allows to keep a server-sent events stream open.
//!

mod dto;
mod event_stream_callback;
mod event_stream_connection;
mod state_machine;

pub use dto::{EventStreamConfig, EventStreamStatus};
pub use event_stream_callback::EventStreamCallback;
pub use event_stream_connection::EventStreamConnection;
