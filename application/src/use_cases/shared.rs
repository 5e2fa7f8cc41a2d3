//! Shared utilities for use cases.

use crate::use_cases::review_workflow::WorkflowError;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(WorkflowError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), WorkflowError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(WorkflowError::Cancelled);
    }
    Ok(())
}
