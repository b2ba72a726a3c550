use super::{Mutation, ReconciliationError};
use crate::error::Error;
use tokio::task::JoinHandle;

///
/// Server confirmation of an optimistic change running in the background.
///
/// Dropping it doesn't cancel the confirmation.
///
pub struct PendingConfirmation {
    operation: Mutation,
    ids: Vec<String>,
    task_handle: JoinHandle<Result<(), ReconciliationError>>,
}

impl PendingConfirmation {
    pub(crate) fn new(
        operation: Mutation,
        ids: Vec<String>,
        task_handle: JoinHandle<Result<(), ReconciliationError>>,
    ) -> Self {
        Self {
            operation,
            ids,
            task_handle,
        }
    }

    pub fn operation(&self) -> Mutation {
        self.operation
    }

    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }

    ///
    /// Wait until server confirms the change or the change is given up.
    ///
    /// ### Errors
    /// - [ReconciliationError] when confirmation failed. Rollback has already been applied
    ///
    pub async fn settled(self) -> Result<(), ReconciliationError> {
        match self.task_handle.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(ReconciliationError {
                operation: self.operation,
                ids: self.ids,
                rolled_back: 0,
                cause: Error::Network("confirmation cancelled".to_string()),
            }),
        }
    }
}
