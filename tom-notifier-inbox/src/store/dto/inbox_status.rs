#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InboxStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,

    /// Snapshot couldn't be loaded. Must be displayed instead of an empty inbox
    Failed(String),

    /// Credentials were rejected, session has to be renewed
    Unauthorized,
}
