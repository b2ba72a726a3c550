use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tom_notifier_inbox::presentation::{PlatformNotifier, PushPermission};

///
/// Console platform. System notifications are written to the log
///
pub struct TracingPlatformNotifier {
    permission: Mutex<PushPermission>,

    /// Decision made when permission is requested
    decision: PushPermission,
}

impl TracingPlatformNotifier {
    pub fn new(decision: PushPermission) -> Self {
        Self {
            permission: Mutex::new(PushPermission::Default),
            decision,
        }
    }
}

#[async_trait]
impl PlatformNotifier for TracingPlatformNotifier {
    fn permission(&self) -> PushPermission {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn request_permission(&self) -> PushPermission {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = self.decision;

        tracing::info!(permission = %self.decision, "push notifications permission decided");

        self.decision
    }

    async fn show(&self, title: &str, body: &str) {
        tracing::info!(title, body, "push notification");
    }
}
