mod notification;
mod unread_count;

pub use notification::*;
pub use unread_count::*;
