use super::category_title;
use crate::dto::NotificationRecord;
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PushPermission {
    /// User hasn't decided yet
    Default,
    Granted,
    Denied,
}

///
/// System level notifications of the platform the inbox runs on.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformNotifier: Send + Sync {
    ///
    /// ### Returns
    /// Decision recorded by the platform
    ///
    fn permission(&self) -> PushPermission;

    async fn request_permission(&self) -> PushPermission;

    async fn show(&self, title: &str, body: &str);
}

///
/// Shows system level notifications only after user opted in.
///
/// Permission is requested at most once and never
/// when platform has already recorded a decision.
///
pub struct PushNotificationsGate {
    notifier: Arc<dyn PlatformNotifier>,
    requested: AtomicBool,
}

impl PushNotificationsGate {
    pub fn new(notifier: Arc<dyn PlatformNotifier>) -> Self {
        Self {
            notifier,
            requested: AtomicBool::new(false),
        }
    }

    pub fn permission(&self) -> PushPermission {
        self.notifier.permission()
    }

    ///
    /// Explicit user request to enable push notifications
    ///
    #[tracing::instrument(name = "Push Notifications", skip_all)]
    pub async fn enable(&self) -> PushPermission {
        let permission = self.notifier.permission();
        if permission != PushPermission::Default {
            tracing::debug!(%permission, "permission already decided");
            return permission;
        }

        if self.requested.swap(true, Ordering::SeqCst) {
            tracing::debug!("permission already requested");
            return permission;
        }

        let permission = self.notifier.request_permission().await;
        tracing::info!(%permission, "permission requested");

        permission
    }

    ///
    /// ### Returns
    /// true when notification was shown
    ///
    pub async fn notify(&self, record: &NotificationRecord) -> bool {
        if self.notifier.permission() != PushPermission::Granted {
            return false;
        }

        self.notifier
            .show(category_title(record.category), &record.message)
            .await;

        true
    }
}
