//!
//! Local cache of the notification inbox.
//!

mod dto;
mod inbox_state;
mod notification_store;
mod pending_confirmation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use dto::*;
pub use inbox_state::InboxState;
pub use notification_store::NotificationStore;
pub use pending_confirmation::PendingConfirmation;
