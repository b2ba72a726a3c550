use event_stream_client::BackoffConfig;

#[derive(Debug, Clone)]
pub struct NotificationsStreamConfig {
    pub base_url: String,
    pub backoff: BackoffConfig,

    /// Number of most recent notification ids remembered per stream.
    /// Replayed notifications with remembered id are dropped
    pub deduplication_window: usize,
}
