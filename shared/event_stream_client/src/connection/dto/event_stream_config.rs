use crate::retry::BackoffConfig;

#[derive(Debug, Clone)]
pub struct EventStreamConfig {
    pub url: String,

    /// Appended to url. Stream requests can't carry custom headers
    /// in browsers, so credentials are usually passed here
    pub query: Vec<(String, String)>,

    pub backoff: BackoffConfig,
}
