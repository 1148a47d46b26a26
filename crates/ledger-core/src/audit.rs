//! Change notifications
//!
//! Every committed mutation is announced to an [`AuditSink`] so an
//! external audit log can persist it. The ledger itself stores nothing
//! about past notifications.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeNotification {
    pub entity: String,
    pub id: String,
    pub action: ChangeAction,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

pub trait AuditSink: Send + Sync {
    fn record(&self, change: ChangeNotification);
}

/// Default sink: forwards each mutation to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, change: ChangeNotification) {
        info!(
            entity = %change.entity,
            id = %change.id,
            action = ?change.action,
            "ledger mutation"
        );
    }
}

/// Buffers notifications in memory, for tests and for callers that
/// forward them to an external store in batches.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    changes: Mutex<Vec<ChangeNotification>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<ChangeNotification> {
        std::mem::take(&mut *self.changes.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.changes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, change: ChangeNotification) {
        self.changes.lock().unwrap().push(change);
    }
}
