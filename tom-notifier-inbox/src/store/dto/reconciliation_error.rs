use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Mutation {
    MarkRead,
    MarkAllRead,
    ClearAll,
}

///
/// Optimistic change that server never confirmed.
///
#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation} not confirmed: {cause}")]
pub struct ReconciliationError {
    pub operation: Mutation,

    /// Records touched by the optimistic change
    pub ids: Vec<String>,

    /// Number of records restored to their previous state.
    /// Records changed again by a later mutation are left untouched
    pub rolled_back: usize,

    pub cause: Error,
}
