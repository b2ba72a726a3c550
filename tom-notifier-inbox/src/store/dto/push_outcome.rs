#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// New record was prepended to the inbox
    Inserted,

    /// Record with the same id already existed and was updated in place
    Merged,

    /// Record doesn't belong to the inbox owner
    Discarded,
}
