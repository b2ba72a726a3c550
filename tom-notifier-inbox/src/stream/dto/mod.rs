mod notifications_stream_config;

pub use notifications_stream_config::*;
