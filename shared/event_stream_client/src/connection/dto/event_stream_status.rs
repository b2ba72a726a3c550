#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStreamStatus {
    Connecting,
    Connected,
    Reconnecting,

    /// Server rejected credentials. Connection won't be retried
    Unauthorized,

    Closed,
}
