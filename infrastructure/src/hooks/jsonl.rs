//! JSONL audit log for workflow notifications.
//!
//! Each [`HookContext`] is serialized as a single JSON line with `type`,
//! `timestamp`, `scope` and `actor` fields merged into the notification
//! payload, appended to the file via a buffered writer.

use async_trait::async_trait;
use screening_application::{HookContext, HookError, HookOrchestrator};
use screening_domain::ProjectId;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Audit orchestrator that writes one JSON object per notification.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Existing files are appended to.
/// Flushes after every line and on `Drop`.
pub struct JsonlHookOrchestrator {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlHookOrchestrator {
    /// Open the audit log at the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit log.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(scope_id: &ProjectId, context: &HookContext) -> Result<String, HookError> {
        let payload = serde_json::to_value(&context.notification)
            .map_err(|e| HookError::DispatchFailed(e.to_string()))?;
        let timestamp = context
            .occurred_at
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge payload with type + timestamp + scope + actor
        let mut map = match payload {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.remove("kind");
        map.insert("type".to_string(), context.kind().into());
        map.insert("timestamp".to_string(), timestamp.into());
        map.insert("scope".to_string(), scope_id.as_str().into());
        map.insert("actor".to_string(), context.actor.clone().into());

        serde_json::to_string(&serde_json::Value::Object(map))
            .map_err(|e| HookError::DispatchFailed(e.to_string()))
    }
}

#[async_trait]
impl HookOrchestrator for JsonlHookOrchestrator {
    async fn process(&self, scope_id: &ProjectId, context: &HookContext) -> Result<(), HookError> {
        let line = Self::record(scope_id, context)?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| HookError::DispatchFailed("audit log writer poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        // The audit trail must survive a crash mid-workflow
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlHookOrchestrator {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
