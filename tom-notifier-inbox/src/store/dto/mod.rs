mod inbox_filter;
mod inbox_status;
mod notification_store_config;
mod push_outcome;
mod reconciliation_error;

pub use inbox_filter::*;
pub use inbox_status::*;
pub use notification_store_config::*;
pub use push_outcome::*;
pub use reconciliation_error::*;
