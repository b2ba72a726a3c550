#[derive(Clone)]
pub struct NotificationsApiConfig {
    pub base_url: String,

    /// Session credential sent as bearer token
    pub token: String,
}
