use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NotificationStoreConfig {
    /// Optimistic change is rolled back when confirmation fails this many times
    pub confirmation_max_attempts: u32,
    pub confirmation_retry_interval: Duration,
}

impl Default for NotificationStoreConfig {
    fn default() -> Self {
        Self {
            confirmation_max_attempts: 3,
            confirmation_retry_interval: Duration::from_secs(2),
        }
    }
}
