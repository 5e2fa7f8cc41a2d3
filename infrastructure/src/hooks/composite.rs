//! Composite hook orchestrator: delegates to multiple orchestrators.
//!
//! Used to fan out workflow notifications to both the tracing log and the
//! JSONL audit trail.
//!
//! ```text
//! ReviewWorkflowUseCase.publish(scope, context)
//!                  |
//!      +-----------+-----------+
//!      |                       |
//! TracingHookOrchestrator  JsonlHookOrchestrator
//! ```

use async_trait::async_trait;
use screening_application::{HookContext, HookError, HookOrchestrator};
use screening_domain::ProjectId;
use std::sync::Arc;

/// Delegates each notification to every inner orchestrator, in order.
///
/// Stops at the first failing delegate and returns its error; later
/// delegates do not see the notification.
#[derive(Default, Clone)]
pub struct CompositeHookOrchestrator {
    delegates: Vec<Arc<dyn HookOrchestrator>>,
}

impl CompositeHookOrchestrator {
    pub fn new(delegates: Vec<Arc<dyn HookOrchestrator>>) -> Self {
        Self { delegates }
    }

    /// Append a delegate
    pub fn with(mut self, delegate: Arc<dyn HookOrchestrator>) -> Self {
        self.delegates.push(delegate);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

#[async_trait]
impl HookOrchestrator for CompositeHookOrchestrator {
    async fn process(&self, scope_id: &ProjectId, context: &HookContext) -> Result<(), HookError> {
        for delegate in &self.delegates {
            delegate.process(scope_id, context).await?;
        }
        Ok(())
    }
}
