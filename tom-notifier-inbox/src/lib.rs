pub mod api;
pub mod dto;
pub mod error;
pub mod presentation;
pub mod session;
pub mod store;
pub mod stream;
