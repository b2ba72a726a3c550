//!
//! Everything one logged in user needs to keep the inbox in sync.
//!

mod dto;
mod inbox_session;
mod session_stream_callback;

pub use dto::*;
pub use inbox_session::InboxSession;
