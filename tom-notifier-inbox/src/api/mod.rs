mod dto;
mod endpoint;
mod notifications_api;
mod notifications_api_impl;

pub use dto::NotificationsApiConfig;
pub use endpoint::endpoint_url;
pub use notifications_api::*;
pub use notifications_api_impl::*;
