mod inbox_credentials;
mod inbox_session_config;

pub use inbox_credentials::*;
pub use inbox_session_config::*;
