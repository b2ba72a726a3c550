use crate::store::NotificationStoreConfig;
use event_stream_client::BackoffConfig;

#[derive(Debug, Clone)]
pub struct InboxSessionConfig {
    pub api_base_url: String,
    pub store: NotificationStoreConfig,
    pub stream_backoff: BackoffConfig,
    pub deduplication_window: usize,
    pub badge_limit: usize,
}
