#![allow(dead_code)]

use async_trait::async_trait;
use event_stream_client::BackoffConfig;
use httpmock::{Mock, MockServer};
use serde_json::{json, Value};
use std::{
    sync::{Mutex, Once},
    time::Duration,
};
use tom_notifier_inbox::{
    presentation::{PlatformNotifier, PushPermission},
    session::{InboxCredentials, InboxSessionConfig},
    store::{InboxState, NotificationStore, NotificationStoreConfig},
};

pub const USER_ID: &str = "7";
pub const TOKEN: &str = "secret";
pub const BEARER: &str = "Bearer secret";

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

static INIT_TEST_ENVIRONMENT_ONCE: Once = Once::new();

pub fn init_test_environment() {
    INIT_TEST_ENVIRONMENT_ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub fn session_config(server: &MockServer) -> InboxSessionConfig {
    InboxSessionConfig {
        api_base_url: server.base_url(),
        store: NotificationStoreConfig {
            confirmation_max_attempts: 2,
            confirmation_retry_interval: Duration::from_millis(10),
        },
        stream_backoff: BackoffConfig::fixed(Duration::from_millis(50)),
        deduplication_window: 64,
        badge_limit: 9,
    }
}

pub fn credentials() -> InboxCredentials {
    InboxCredentials {
        user_id: USER_ID.to_string(),
        token: TOKEN.to_string(),
    }
}

pub fn notification_json(id: &str, is_read: bool, created_at: &str) -> Value {
    json!({
        "id": id,
        "ownerId": USER_ID,
        "category": "APPOINTMENT_ASSIGNED",
        "message": format!("notification {id}"),
        "isRead": is_read,
        "createdAt": created_at,
    })
}

///
/// Body of `text/event-stream` response with one `notification` event per record
///
pub fn event_stream_body(notifications: &[Value]) -> String {
    notifications
        .iter()
        .map(|notification| {
            format!(
                "id: {}\nevent: notification\ndata: {}\n\n",
                notification["id"].as_str().unwrap_or_default(),
                notification,
            )
        })
        .collect()
}

pub async fn wait_for_state<F>(store: &NotificationStore, predicate: F)
where
    F: Fn(&InboxState) -> bool,
{
    let mut state_rx = store.subscribe();
    tokio::time::timeout(WAIT_TIMEOUT, state_rx.wait_for(|state| predicate(state)))
        .await
        .expect("state not reached in time")
        .expect("store dropped");
}

pub async fn wait_for_hits(mock: &Mock<'_>, hits: usize) {
    tokio::time::timeout(WAIT_TIMEOUT, async {
        while mock.hits_async().await < hits {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("mock not hit in time");
}

pub struct TestNotifier {
    permission: Mutex<PushPermission>,
    decision: PushPermission,
    shown: Mutex<Vec<String>>,
}

impl TestNotifier {
    pub fn new(decision: PushPermission) -> Self {
        Self {
            permission: Mutex::new(PushPermission::Default),
            decision,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformNotifier for TestNotifier {
    fn permission(&self) -> PushPermission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> PushPermission {
        *self.permission.lock().unwrap() = self.decision;
        self.decision
    }

    async fn show(&self, _title: &str, body: &str) {
        self.shown.lock().unwrap().push(body.to_string());
    }
}
