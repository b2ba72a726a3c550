use super::{
    inbox_state::LoadToken, InboxFilter, InboxState, InboxStatus, Mutation,
    NotificationStoreConfig, PendingConfirmation, PushOutcome, ReconciliationError,
};
use crate::{api::NotificationsApi, dto::NotificationRecord, error::Error};
use event_stream_client::retry::retry_bounded;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;

const RECONCILIATION_CHANNEL_CAPACITY: usize = 32;

///
/// Single source of truth of the inbox owned by one user.
///
/// Every change is applied locally first and published to subscribers.
/// Mutations are confirmed with the server in the background.
///
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

struct Inner {
    owner_id: String,
    config: NotificationStoreConfig,
    api: Arc<dyn NotificationsApi>,

    state_tx: watch::Sender<InboxState>,
    reconciliation_tx: broadcast::Sender<ReconciliationError>,
}

enum PendingMutation {
    MarkRead { id: String },
    MarkAllRead { flipped: Vec<String> },
    ClearAll { removed: Vec<NotificationRecord> },
}

impl PendingMutation {
    fn operation(&self) -> Mutation {
        match self {
            PendingMutation::MarkRead { .. } => Mutation::MarkRead,
            PendingMutation::MarkAllRead { .. } => Mutation::MarkAllRead,
            PendingMutation::ClearAll { .. } => Mutation::ClearAll,
        }
    }

    fn ids(&self) -> Vec<String> {
        match self {
            PendingMutation::MarkRead { id } => vec![id.clone()],
            PendingMutation::MarkAllRead { flipped } => flipped.clone(),
            PendingMutation::ClearAll { removed } => {
                removed.iter().map(|record| record.id.clone()).collect()
            }
        }
    }
}

impl NotificationStore {
    pub fn new(
        owner_id: impl Into<String>,
        config: NotificationStoreConfig,
        api: Arc<dyn NotificationsApi>,
    ) -> Self {
        let (state_tx, _) = watch::channel(InboxState::default());
        let (reconciliation_tx, _) = broadcast::channel(RECONCILIATION_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                owner_id: owner_id.into(),
                config,
                api,
                state_tx,
                reconciliation_tx,
            }),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.inner.owner_id
    }

    pub fn state(&self) -> InboxState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn list(&self) -> Vec<NotificationRecord> {
        self.inner.state_tx.borrow().list()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.state_tx.borrow().unread_count()
    }

    pub fn status(&self) -> InboxStatus {
        self.inner.state_tx.borrow().status().clone()
    }

    pub fn filter(&self, filter: InboxFilter) -> Vec<NotificationRecord> {
        self.inner.state_tx.borrow().filter(filter)
    }

    ///
    /// Receiver is notified after every change of the inbox
    ///
    pub fn subscribe(&self) -> watch::Receiver<InboxState> {
        self.inner.state_tx.subscribe()
    }

    pub fn reconciliation_errors(&self) -> broadcast::Receiver<ReconciliationError> {
        self.inner.reconciliation_tx.subscribe()
    }

    ///
    /// Fetch notifications and unread count concurrently and install them.
    /// Records pushed and local changes made while fetching are preserved.
    ///
    /// ### Errors
    /// - [Error::Unauthorized] when credentials were rejected
    /// - any other [Error] when any of the calls failed.
    ///   Records are left untouched, status becomes [InboxStatus::Failed]
    ///
    #[tracing::instrument(
        name = "Load snapshot",
        skip_all,
        fields(owner_id = %self.inner.owner_id)
    )]
    pub async fn load_snapshot(&self) -> Result<(), Error> {
        tracing::info!("loading snapshot");

        let mut load = LoadToken::default();
        self.inner
            .state_tx
            .send_modify(|state| load = state.begin_load());

        let owner_id = self.inner.owner_id.as_str();
        let result = tokio::try_join!(
            self.inner.api.fetch_notifications(owner_id),
            self.inner.api.fetch_unread_count(owner_id),
        );

        let (mut records, server_unread_count) = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!(%err, "loading snapshot failed");
                self.inner
                    .state_tx
                    .send_modify(|state| state.fail_load(load, &err));
                return Err(err);
            }
        };

        let fetched = records.len();
        records.retain(|record| record.owner_id == owner_id);
        if records.len() != fetched {
            tracing::warn!(
                discarded = fetched - records.len(),
                "snapshot contains notifications of another user"
            );
        }

        let mut unread_count = 0;
        self.inner.state_tx.send_modify(|state| {
            state.install_snapshot(load, records);
            unread_count = state.unread_count();
        });

        if unread_count != server_unread_count {
            tracing::warn!(
                unread_count,
                server_unread_count,
                "server unread count differs from notifications"
            );
        }
        tracing::info!(unread_count, "snapshot loaded");

        Ok(())
    }

    ///
    /// Insert or merge notification delivered by the stream
    ///
    pub fn apply_pushed_event(&self, record: NotificationRecord) -> PushOutcome {
        if record.owner_id != self.inner.owner_id {
            tracing::warn!(
                id = %record.id,
                owner_id = %record.owner_id,
                "discarded notification of another user"
            );
            return PushOutcome::Discarded;
        }

        let mut outcome = PushOutcome::Discarded;
        self.inner
            .state_tx
            .send_modify(|state| outcome = state.apply_pushed(record));

        tracing::trace!(?outcome, "applied pushed notification");

        outcome
    }

    ///
    /// Mark single notification read.
    ///
    /// ### Returns
    /// None when notification doesn't exist or is already read
    ///
    pub fn mark_read(&self, id: &str) -> Option<PendingConfirmation> {
        let mut revision = None;
        self.inner.state_tx.send_if_modified(|state| {
            revision = state.mark_read(id);
            revision.is_some()
        });

        let revision = revision?;
        let mutation = PendingMutation::MarkRead { id: id.to_string() };

        Some(self.confirm(mutation, revision))
    }

    pub fn mark_all_read(&self) -> PendingConfirmation {
        let mut change = (0, Vec::new());
        self.inner
            .state_tx
            .send_modify(|state| change = state.mark_all_read());

        let (revision, flipped) = change;
        let mutation = PendingMutation::MarkAllRead { flipped };

        self.confirm(mutation, revision)
    }

    pub fn clear_all(&self) -> PendingConfirmation {
        let mut change = (0, Vec::new());
        self.inner
            .state_tx
            .send_modify(|state| change = state.clear_all());

        let (revision, removed) = change;
        let mutation = PendingMutation::ClearAll { removed };

        self.confirm(mutation, revision)
    }

    pub fn mark_unauthorized(&self) {
        self.inner.state_tx.send_if_modified(|state| {
            if *state.status() == InboxStatus::Unauthorized {
                return false;
            }

            state.set_status(InboxStatus::Unauthorized);
            true
        });
    }

    fn confirm(&self, mutation: PendingMutation, revision: u64) -> PendingConfirmation {
        let operation = mutation.operation();
        let ids = mutation.ids();

        let span = tracing::info_span!("Confirmation", %operation, revision);
        let store = self.clone();
        let task_handle = tokio::spawn(
            async move { store.run_confirmation(mutation, revision).await }.instrument(span),
        );

        PendingConfirmation::new(operation, ids, task_handle)
    }

    async fn run_confirmation(
        &self,
        mutation: PendingMutation,
        revision: u64,
    ) -> Result<(), ReconciliationError> {
        let config = &self.inner.config;
        let result = retry_bounded(
            config.confirmation_max_attempts,
            config.confirmation_retry_interval,
            Error::is_unauthorized,
            |attempt| {
                let mutation = &mutation;
                async move {
                    let result = self.send_confirmation(mutation).await;
                    if let Err(err) = &result {
                        tracing::warn!(attempt, %err, "confirmation attempt failed");
                    }

                    result
                }
            },
        )
        .await;

        let cause = match result {
            Ok(()) => {
                tracing::debug!("confirmed");
                return Ok(());
            }
            Err(cause) => cause,
        };

        if cause.is_unauthorized() {
            self.mark_unauthorized();
        }

        let operation = mutation.operation();
        let ids = mutation.ids();
        let rolled_back = self.rollback(mutation, revision);

        tracing::error!(%cause, rolled_back, "optimistic change not confirmed");

        let err = ReconciliationError {
            operation,
            ids,
            rolled_back,
            cause,
        };
        // Nobody may be listening
        let _ = self.inner.reconciliation_tx.send(err.clone());

        Err(err)
    }

    async fn send_confirmation(&self, mutation: &PendingMutation) -> Result<(), Error> {
        let api = &self.inner.api;
        match mutation {
            PendingMutation::MarkRead { id } => api.mark_read(id).await,
            PendingMutation::MarkAllRead { .. } => api.mark_all_read(&self.inner.owner_id).await,
            PendingMutation::ClearAll { .. } => api.clear_all(&self.inner.owner_id).await,
        }
    }

    fn rollback(&self, mutation: PendingMutation, revision: u64) -> usize {
        let mut restored = 0;
        self.inner.state_tx.send_if_modified(|state| {
            restored = match mutation {
                PendingMutation::MarkRead { id } => state.rollback_read(&[id], revision),
                PendingMutation::MarkAllRead { flipped } => state.rollback_read(&flipped, revision),
                PendingMutation::ClearAll { removed } => state.rollback_clear(removed, revision),
            };
            restored > 0
        });

        restored
    }
}
