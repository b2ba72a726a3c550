mod event_stream_config;
mod event_stream_status;

pub use event_stream_config::*;
pub use event_stream_status::*;
