use super::{
    category_title, format_relative, unread_badge, PushNotificationsGate, PushPermission,
    DEFAULT_BADGE_LIMIT,
};
use crate::{
    dto::{NotificationCategory, NotificationRecord},
    store::{InboxFilter, InboxStatus, NotificationStore, PendingConfirmation},
};
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub id: String,
    pub category: NotificationCategory,
    pub title: &'static str,
    pub message: String,
    pub age: String,
    pub is_read: bool,
}

impl NotificationItem {
    fn new(record: NotificationRecord, now: OffsetDateTime) -> Self {
        Self {
            title: category_title(record.category),
            age: format_relative(record.created_at, now),
            id: record.id,
            category: record.category,
            message: record.message,
            is_read: record.is_read,
        }
    }
}

///
/// State of the inbox panel and user intents forwarded to the store.
///
pub struct InboxController {
    store: NotificationStore,
    push_gate: Arc<PushNotificationsGate>,

    panel_open: bool,
    filter: InboxFilter,
    badge_limit: usize,
}

impl InboxController {
    pub fn new(store: NotificationStore, push_gate: Arc<PushNotificationsGate>) -> Self {
        Self {
            store,
            push_gate,
            panel_open: false,
            filter: InboxFilter::default(),
            badge_limit: DEFAULT_BADGE_LIMIT,
        }
    }

    pub fn with_badge_limit(mut self, badge_limit: usize) -> Self {
        self.badge_limit = badge_limit;
        self
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub fn filter(&self) -> InboxFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: InboxFilter) {
        self.filter = filter;
    }

    pub fn items(&self, now: OffsetDateTime) -> Vec<NotificationItem> {
        self.store
            .filter(self.filter)
            .into_iter()
            .map(|record| NotificationItem::new(record, now))
            .collect()
    }

    ///
    /// Clicking unread notification marks it read.
    ///
    /// ### Returns
    /// None when nothing had to be changed
    ///
    pub fn record_clicked(&self, id: &str) -> Option<PendingConfirmation> {
        self.store.mark_read(id)
    }

    pub fn mark_all_read(&self) -> PendingConfirmation {
        self.store.mark_all_read()
    }

    pub fn clear_all(&self) -> PendingConfirmation {
        self.store.clear_all()
    }

    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    pub fn badge(&self) -> Option<String> {
        unread_badge(self.store.unread_count(), self.badge_limit)
    }

    pub fn status(&self) -> InboxStatus {
        self.store.status()
    }

    pub async fn enable_push_notifications(&self) -> PushPermission {
        self.push_gate.enable().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        api::MockNotificationsApi,
        presentation::MockPlatformNotifier,
        store::{
            test_utils::{create_record, OWNER_ID},
            NotificationStoreConfig,
        },
    };
    use mockall::predicate::eq;

    fn create_controller(api: MockNotificationsApi) -> InboxController {
        let store = NotificationStore::new(OWNER_ID, NotificationStoreConfig::default(), Arc::new(api));

        let mut notifier = MockPlatformNotifier::new();
        notifier
            .expect_permission()
            .return_const(PushPermission::Default);
        notifier
            .expect_request_permission()
            .times(..=1)
            .return_const(PushPermission::Granted);
        let push_gate = PushNotificationsGate::new(Arc::new(notifier));

        InboxController::new(store, Arc::new(push_gate))
    }

    fn push(controller: &InboxController, records: Vec<NotificationRecord>) {
        for record in records {
            controller.store.apply_pushed_event(record);
        }
    }

    #[test]
    fn toggle_panel() {
        let mut controller = create_controller(MockNotificationsApi::new());
        assert!(!controller.is_panel_open());

        controller.toggle_panel();
        assert!(controller.is_panel_open());

        controller.close_panel();
        assert!(!controller.is_panel_open());

        controller.open_panel();
        controller.open_panel();
        assert!(controller.is_panel_open());
    }

    #[test]
    fn items_follow_filter() {
        let mut controller = create_controller(MockNotificationsApi::new());
        push(
            &controller,
            vec![create_record("B", true, 120), create_record("A", false, 5)],
        );
        let now = OffsetDateTime::now_utc();

        let all = controller.items(now);
        controller.set_filter("unread".parse().unwrap());
        let unread = controller.items(now);

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "A");
        assert_eq!(all[0].title, "New appointment");
        assert_eq!(all[0].age, "5m ago");
        assert_eq!(all[1].age, "2h ago");
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, "A");
    }

    #[test]
    fn badge_is_clamped() {
        let controller = create_controller(MockNotificationsApi::new()).with_badge_limit(2);
        assert_eq!(controller.badge(), None);

        push(
            &controller,
            vec![
                create_record("A", false, 3),
                create_record("B", false, 2),
                create_record("C", false, 1),
            ],
        );

        assert_eq!(controller.badge().as_deref(), Some("2+"));
        assert_eq!(controller.unread_count(), 3);
    }

    #[tokio::test]
    async fn record_clicked_marks_unread_only() {
        let mut api = MockNotificationsApi::new();
        api.expect_mark_read()
            .with(eq("A"))
            .times(1)
            .returning(|_| Ok(()));
        let controller = create_controller(api);
        push(
            &controller,
            vec![create_record("B", true, 10), create_record("A", false, 5)],
        );

        let pending = controller.record_clicked("A");
        let already_read = controller.record_clicked("B");

        assert!(already_read.is_none());
        pending.unwrap().settled().await.unwrap();
        assert_eq!(controller.unread_count(), 0);
    }

    #[tokio::test]
    async fn bulk_actions() {
        let mut api = MockNotificationsApi::new();
        api.expect_mark_all_read().times(1).returning(|_| Ok(()));
        api.expect_clear_all().times(1).returning(|_| Ok(()));
        let controller = create_controller(api);
        push(
            &controller,
            vec![create_record("A", false, 10), create_record("B", false, 5)],
        );

        controller.mark_all_read().settled().await.unwrap();
        assert_eq!(controller.badge(), None);
        assert_eq!(controller.items(OffsetDateTime::now_utc()).len(), 2);

        controller.clear_all().settled().await.unwrap();
        assert!(controller.items(OffsetDateTime::now_utc()).is_empty());
        assert_eq!(controller.status(), InboxStatus::NotLoaded);
    }

    #[tokio::test]
    async fn enable_push_notifications_asks_platform() {
        let controller = create_controller(MockNotificationsApi::new());

        assert_eq!(
            controller.enable_push_notifications().await,
            PushPermission::Granted
        );
    }
}
