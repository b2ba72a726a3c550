//!
//! Notification streams of logged in users.
//!
//! Every user has at most one open stream. Streams recover from failures
//! by themselves, callers are notified about them through callback.
//!

mod connection_handle;
mod dto;
mod notifications_deduplication;
mod notifications_event_callback;
mod notifications_stream_callback;
mod notifications_stream_manager;

pub use connection_handle::ConnectionHandle;
pub use dto::NotificationsStreamConfig;
pub use notifications_deduplication::NotificationsDeduplication;
pub use notifications_stream_callback::NotificationsStreamCallback;
pub use notifications_stream_manager::NotificationsStreamManager;
