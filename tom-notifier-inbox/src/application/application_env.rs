use anyhow::anyhow;
use event_stream_client::BackoffConfig;
use std::{str::FromStr, time::Duration};
use tom_notifier_inbox::{
    presentation::PushPermission,
    session::{InboxCredentials, InboxSessionConfig},
    store::NotificationStoreConfig,
};

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub api_base_url: String,
    pub user_id: String,
    pub token: String,

    pub stream_reconnect_initial_delay: Duration,
    pub stream_reconnect_max_delay: Duration,
    pub stream_deduplication_window: usize,

    pub confirmation_max_attempts: u32,
    pub confirmation_retry_interval: Duration,

    pub badge_limit: usize,

    /// User opted in for system notifications
    pub enable_push_notifications: bool,

    /// Decision reported by the console notifier
    pub push_permission: PushPermission,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("TOM_NOTIFIER_INBOX_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("TOM_NOTIFIER_INBOX_LOG_FILENAME")?;
        let api_base_url = Self::env_var("TOM_NOTIFIER_INBOX_API_BASE_URL")?;
        let user_id = Self::env_var("TOM_NOTIFIER_INBOX_USER_ID")?;
        let token = Self::env_var("TOM_NOTIFIER_INBOX_TOKEN")?;
        let stream_reconnect_initial_delay = Duration::from_secs(
            Self::env_var("TOM_NOTIFIER_INBOX_STREAM_RECONNECT_INITIAL_DELAY")?.parse()?,
        );
        let stream_reconnect_max_delay = Duration::from_secs(
            Self::env_var("TOM_NOTIFIER_INBOX_STREAM_RECONNECT_MAX_DELAY")?.parse()?,
        );
        let stream_deduplication_window =
            Self::env_var("TOM_NOTIFIER_INBOX_STREAM_DEDUPLICATION_WINDOW")?.parse()?;
        let confirmation_max_attempts =
            Self::env_var("TOM_NOTIFIER_INBOX_CONFIRMATION_MAX_ATTEMPTS")?.parse()?;
        let confirmation_retry_interval = Duration::from_millis(
            Self::env_var("TOM_NOTIFIER_INBOX_CONFIRMATION_RETRY_INTERVAL_MS")?.parse()?,
        );
        let badge_limit = Self::env_var("TOM_NOTIFIER_INBOX_BADGE_LIMIT")?.parse()?;
        let enable_push_notifications =
            Self::env_var("TOM_NOTIFIER_INBOX_ENABLE_PUSH_NOTIFICATIONS")?.parse()?;
        let push_permission =
            PushPermission::from_str(&Self::env_var("TOM_NOTIFIER_INBOX_PUSH_PERMISSION")?)?;

        if stream_reconnect_max_delay < stream_reconnect_initial_delay {
            return Err(anyhow!(
                "TOM_NOTIFIER_INBOX_STREAM_RECONNECT_MAX_DELAY can't be lower than initial delay"
            ));
        }

        Ok(Self {
            log_directory,
            log_filename,
            api_base_url,
            user_id,
            token,
            stream_reconnect_initial_delay,
            stream_reconnect_max_delay,
            stream_deduplication_window,
            confirmation_max_attempts,
            confirmation_retry_interval,
            badge_limit,
            enable_push_notifications,
            push_permission,
        })
    }

    pub fn session_config(&self) -> InboxSessionConfig {
        InboxSessionConfig {
            api_base_url: self.api_base_url.clone(),
            store: NotificationStoreConfig {
                confirmation_max_attempts: self.confirmation_max_attempts,
                confirmation_retry_interval: self.confirmation_retry_interval,
            },
            stream_backoff: BackoffConfig {
                initial_delay: self.stream_reconnect_initial_delay,
                max_delay: self.stream_reconnect_max_delay,
                ..Default::default()
            },
            deduplication_window: self.stream_deduplication_window,
            badge_limit: self.badge_limit,
        }
    }

    pub fn credentials(&self) -> InboxCredentials {
        InboxCredentials {
            user_id: self.user_id.clone(),
            token: self.token.clone(),
        }
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }
}
