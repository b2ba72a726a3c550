//!
//! Contract used by user interfaces displaying the inbox.
//!

mod badge;
mod category;
mod inbox_controller;
mod push_permission;
mod relative_time;

pub use badge::*;
pub use category::*;
pub use inbox_controller::*;
pub use push_permission::*;
pub use relative_time::*;
