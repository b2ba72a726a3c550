use std::collections::{HashSet, VecDeque};

type DeliveryKey = (String, bool);

///
/// Window of the most recently delivered notifications.
///
/// Streams are at-least-once, events can be replayed after reconnection.
/// Deliveries are told apart by id and read flag, so server confirming
/// read state still gets through. Other changes of a delivered
/// notification (e.g. message) are dropped as replays.
/// Oldest delivery is forgotten when window is full.
///
pub struct NotificationsDeduplication {
    capacity: usize,
    order: VecDeque<DeliveryKey>,
    delivered: HashSet<DeliveryKey>,
}

impl NotificationsDeduplication {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            delivered: HashSet::with_capacity(capacity),
        }
    }

    ///
    /// Remember delivery of notification in the given read state.
    ///
    /// ### Returns
    /// false when the same delivery is already remembered
    ///
    pub fn deduplicate(&mut self, id: &str, is_read: bool) -> bool {
        let key = (id.to_string(), is_read);
        if self.delivered.contains(&key) {
            tracing::trace!(id, is_read, "duplicated notification");
            return false;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.delivered.remove(&oldest);
            }
        }

        self.order.push_back(key.clone());
        self.delivered.insert(key);

        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
