//!
//! Module with server-sent events wire format
//!

mod event_parser;
mod server_sent_event;

pub use event_parser::EventParser;
pub use server_sent_event::ServerSentEvent;
