#[derive(Clone)]
pub struct InboxCredentials {
    pub user_id: String,
    pub token: String,
}

impl std::fmt::Debug for InboxCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxCredentials")
            .field("user_id", &self.user_id)
            .field("token", &"***")
            .finish()
    }
}
