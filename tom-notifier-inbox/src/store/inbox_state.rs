use super::{InboxFilter, InboxStatus, PushOutcome};
use crate::{dto::NotificationRecord, error::Error};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq)]
struct StoredRecord {
    record: NotificationRecord,

    /// Revision of the last local mutation that changed the record.
    /// 0 means record is in the state server sent it
    revision: u64,
}

///
/// Inbox content with transitions that keep it consistent.
///
/// Records are kept in a map keyed by id, so the same notification
/// delivered twice (snapshot and stream) is stored only once.
/// `order` keeps ids most recent first.
///
///
/// Identifies one snapshot fetch between [InboxState::begin_load]
/// and its installation or failure
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LoadToken(u64);

#[derive(Debug, Clone, Copy)]
struct PendingLoad {
    token: LoadToken,

    /// Revision of the inbox when the fetch started
    since: u64,
}

#[derive(Debug, Clone, Default)]
pub struct InboxState {
    order: VecDeque<String>,
    records: HashMap<String, StoredRecord>,
    unread_count: usize,

    status: InboxStatus,

    revision: u64,
    last_clear_revision: u64,

    next_load: u64,
    pending_loads: Vec<PendingLoad>,

    /// Ids pushed since the oldest pending load started
    pushed_during_load: Vec<String>,
}

impl InboxState {
    pub fn list(&self) -> Vec<NotificationRecord> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|stored| &stored.record)
    }

    pub fn get(&self, id: &str) -> Option<&NotificationRecord> {
        self.records.get(id).map(|stored| &stored.record)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn status(&self) -> &InboxStatus {
        &self.status
    }

    pub fn filter(&self, filter: InboxFilter) -> Vec<NotificationRecord> {
        self.iter()
            .filter(|record| match filter {
                InboxFilter::All => true,
                InboxFilter::Unread => !record.is_read,
            })
            .cloned()
            .collect()
    }

    ///
    /// [InboxStatus::Unauthorized] is final, only new session can leave it
    ///
    pub(crate) fn set_status(&mut self, status: InboxStatus) {
        if self.status != InboxStatus::Unauthorized {
            self.status = status;
        }
    }

    ///
    /// Mark the beginning of snapshot fetch.
    /// Records pushed from now on survive installation of this
    /// and every other pending snapshot.
    ///
    pub(crate) fn begin_load(&mut self) -> LoadToken {
        self.set_status(InboxStatus::Loading);

        self.next_load += 1;
        let token = LoadToken(self.next_load);
        self.pending_loads.push(PendingLoad {
            token,
            since: self.revision,
        });

        token
    }

    pub(crate) fn fail_load(&mut self, token: LoadToken, err: &Error) {
        self.finish_load(token);
        self.set_status(match err {
            Error::Unauthorized => InboxStatus::Unauthorized,
            err => InboxStatus::Failed(err.to_string()),
        });
    }

    ///
    /// Replace content with the snapshot.
    ///
    /// Local changes made while snapshot was fetched win:
    /// - records pushed during the fetch are kept,
    /// - records marked read during the fetch stay read,
    /// - snapshot taken before clearing is ignored.
    ///
    pub(crate) fn install_snapshot(
        &mut self,
        token: LoadToken,
        snapshot: Vec<NotificationRecord>,
    ) {
        // Other pending loads still need the pushed ids
        let pushed_during_load = self.pushed_during_load.clone();
        let loading_since = self.finish_load(token).unwrap_or(self.revision);
        let mut previous_records = std::mem::take(&mut self.records);
        let previous_order = std::mem::take(&mut self.order);

        if self.last_clear_revision > loading_since {
            tracing::debug!("snapshot outdated by clearing, keeping current records");
            self.order = previous_order;
            self.records = previous_records;
        } else {
            for record in snapshot {
                if self.records.contains_key(&record.id) {
                    tracing::warn!(id = %record.id, "snapshot contains duplicated id");
                    continue;
                }

                let mut stored = StoredRecord {
                    record,
                    revision: 0,
                };
                if let Some(previous) = previous_records.get(&stored.record.id) {
                    if previous.revision > loading_since && previous.record.is_read {
                        stored.record.is_read = true;
                        stored.revision = previous.revision;
                    }
                }

                self.order.push_back(stored.record.id.clone());
                self.records.insert(stored.record.id.clone(), stored);
            }

            for id in pushed_during_load {
                if self.records.contains_key(&id) {
                    continue;
                }
                if let Some(previous) = previous_records.remove(&id) {
                    self.order.push_front(id.clone());
                    self.records.insert(id, previous);
                }
            }

        }

        self.unread_count = self.count_unread();
        self.set_status(InboxStatus::Loaded);
    }

    ///
    /// Upsert record delivered by the stream.
    /// Read flag can only go from unread to read.
    ///
    pub(crate) fn apply_pushed(&mut self, record: NotificationRecord) -> PushOutcome {
        if let Some(stored) = self.records.get_mut(&record.id) {
            let was_read = stored.record.is_read;

            stored.record.category = record.category;
            stored.record.message = record.message;
            stored.record.auxiliary_data = record.auxiliary_data;

            if record.is_read {
                // Server confirmed read state, nothing left to roll back
                stored.record.is_read = true;
                stored.revision = 0;
            }
            if !was_read && stored.record.is_read {
                self.unread_count -= 1;
            }

            return PushOutcome::Merged;
        }

        if !record.is_read {
            self.unread_count += 1;
        }
        if !self.pending_loads.is_empty() {
            self.pushed_during_load.push(record.id.clone());
        }

        self.order.push_front(record.id.clone());
        self.records.insert(
            record.id.clone(),
            StoredRecord {
                record,
                revision: 0,
            },
        );

        PushOutcome::Inserted
    }

    ///
    /// ### Returns
    /// Revision of the change or None when record is missing or already read
    ///
    pub(crate) fn mark_read(&mut self, id: &str) -> Option<u64> {
        let stored = self.records.get_mut(id)?;
        if stored.record.is_read {
            return None;
        }

        self.revision += 1;
        stored.record.is_read = true;
        stored.revision = self.revision;
        self.unread_count -= 1;

        Some(self.revision)
    }

    ///
    /// ### Returns
    /// Revision of the change and ids of records that changed
    ///
    pub(crate) fn mark_all_read(&mut self) -> (u64, Vec<String>) {
        self.revision += 1;

        let mut changed = Vec::with_capacity(self.unread_count);
        for id in self.order.iter() {
            let Some(stored) = self.records.get_mut(id) else {
                continue;
            };
            // Read records are stamped too, so pending single mark read can't roll them back
            stored.revision = self.revision;
            if !stored.record.is_read {
                stored.record.is_read = true;
                changed.push(id.clone());
            }
        }
        self.unread_count = 0;

        (self.revision, changed)
    }

    ///
    /// ### Returns
    /// Revision of the change and removed records, most recent first
    ///
    pub(crate) fn clear_all(&mut self) -> (u64, Vec<NotificationRecord>) {
        self.revision += 1;
        self.last_clear_revision = self.revision;

        let mut records = std::mem::take(&mut self.records);
        let removed = std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|id| records.remove(&id))
            .map(|stored| stored.record)
            .collect();
        self.unread_count = 0;

        (self.revision, removed)
    }

    ///
    /// Make records unread again unless they were changed after `revision`.
    ///
    /// ### Returns
    /// Number of restored records
    ///
    pub(crate) fn rollback_read(&mut self, ids: &[String], revision: u64) -> usize {
        let mut restored = 0;
        for id in ids {
            let Some(stored) = self.records.get_mut(id) else {
                continue;
            };
            if stored.revision == revision && stored.record.is_read {
                stored.record.is_read = false;
                stored.revision = 0;
                restored += 1;
            }
        }
        self.unread_count += restored;

        restored
    }

    ///
    /// Bring back cleared records unless inbox was cleared again after `revision`.
    /// Records that came back in the meantime are not duplicated.
    ///
    /// ### Returns
    /// Number of restored records
    ///
    pub(crate) fn rollback_clear(&mut self, removed: Vec<NotificationRecord>, revision: u64) -> usize {
        if self.last_clear_revision != revision {
            return 0;
        }

        let mut restored = 0;
        for record in removed {
            if self.records.contains_key(&record.id) {
                continue;
            }

            let position = self
                .order
                .iter()
                .position(|id| {
                    self.records
                        .get(id)
                        .is_some_and(|stored| stored.record.created_at < record.created_at)
                })
                .unwrap_or(self.order.len());

            if !record.is_read {
                self.unread_count += 1;
            }
            self.order.insert(position, record.id.clone());
            self.records.insert(
                record.id.clone(),
                StoredRecord {
                    record,
                    revision: 0,
                },
            );
            restored += 1;
        }

        restored
    }

    ///
    /// Forget pending load. Pushed ids are dropped once no load is pending.
    ///
    /// ### Returns
    /// Revision of the inbox when the load started, None for unknown token
    ///
    fn finish_load(&mut self, token: LoadToken) -> Option<u64> {
        let position = self
            .pending_loads
            .iter()
            .position(|load| load.token == token)?;
        let load = self.pending_loads.remove(position);

        if self.pending_loads.is_empty() {
            self.pushed_during_load.clear();
        }

        Some(load.since)
    }

    fn count_unread(&self) -> usize {
        self.records
            .values()
            .filter(|stored| !stored.record.is_read)
            .count()
    }
}
