//! Hook orchestrator that keeps notifications in memory.

use async_trait::async_trait;
use screening_application::{HookContext, HookError, HookOrchestrator};
use screening_domain::ProjectId;
use tokio::sync::Mutex;

/// Records every `(scope, context)` pair it receives, in arrival order.
///
/// Used by the demo command to replay what happened, and by tests.
#[derive(Debug, Default)]
pub struct RecordingHookOrchestrator {
    contexts: Mutex<Vec<(ProjectId, HookContext)>>,
}

impl RecordingHookOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub async fn contexts(&self) -> Vec<(ProjectId, HookContext)> {
        self.contexts.lock().await.clone()
    }

    /// Notification kinds in arrival order
    pub async fn kinds(&self) -> Vec<&'static str> {
        self.contexts
            .lock()
            .await
            .iter()
            .map(|(_, c)| c.kind())
            .collect()
    }
}

#[async_trait]
impl HookOrchestrator for RecordingHookOrchestrator {
    async fn process(&self, scope_id: &ProjectId, context: &HookContext) -> Result<(), HookError> {
        self.contexts
            .lock()
            .await
            .push((scope_id.clone(), context.clone()));
        Ok(())
    }
}
