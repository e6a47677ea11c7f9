//! Registry tables, rendered in two phases.
//!
//! Phase one turns every document into a row straight away. A row that
//! points into another collection (a project's contractor, an article's
//! project) gets a [`ReferenceCell::Pending`] holding the id to look up
//! and the label to fall back on.
//!
//! Phase two spawns one task per pending cell. Each task looks up its
//! reference and sends a [`ResolvedReference`] back over a channel; a
//! single collector applies the messages, so rows are only ever mutated
//! in one place. Rows keep their document order.

use std::sync::Arc;

use qtrace_core::types::DocId;
use qtrace_db::repositories::{ContractorRepo, Entity, ProjectRepo};
use qtrace_db::store::DocumentStore;
use serde::{Serialize, Serializer};
use tokio::sync::mpsc;

pub mod options;
pub mod rows;

/// Buffered resolution messages before senders wait on the collector.
const RESOLUTION_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Contractor,
    Project,
}

/// A lookup still to be made for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReference {
    pub kind: ReferenceKind,
    pub id: DocId,
    /// Shown when the referenced document is missing or unreadable.
    pub fallback: String,
}

/// A cell showing another document's label.
///
/// Serializes as its label: a pending cell reads as its fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCell {
    Label(String),
    Pending(PendingReference),
}

impl ReferenceCell {
    pub fn label(&self) -> &str {
        match self {
            ReferenceCell::Label(label) => label,
            ReferenceCell::Pending(pending) => &pending.fallback,
        }
    }

    pub fn pending(&self) -> Option<&PendingReference> {
        match self {
            ReferenceCell::Pending(pending) => Some(pending),
            ReferenceCell::Label(_) => None,
        }
    }

    /// Give up on a pending lookup and show the fallback.
    fn settle(&mut self) {
        if let ReferenceCell::Pending(pending) = self {
            let fallback = std::mem::take(&mut pending.fallback);
            *self = ReferenceCell::Label(fallback);
        }
    }
}

impl Serialize for ReferenceCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A row with one reference cell.
pub trait ReferenceRow: Send + 'static {
    fn reference_mut(&mut self) -> &mut ReferenceCell;
}

/// Outcome of one lookup, addressed to the row that asked for it.
#[derive(Debug)]
pub struct ResolvedReference {
    pub row: usize,
    pub label: String,
}

/// Run phase two over `rows`.
///
/// Every pending cell ends up as a label: the resolved one, or the
/// fallback when the lookup fails or its task never reports back.
pub async fn resolve_references<R: ReferenceRow>(
    store: Arc<dyn DocumentStore>,
    mut rows: Vec<R>,
) -> Vec<R> {
    let (tx, mut rx) = mpsc::channel::<ResolvedReference>(RESOLUTION_BUFFER);

    let mut spawned = 0usize;
    for (row, item) in rows.iter_mut().enumerate() {
        let Some(pending) = item.reference_mut().pending().cloned() else {
            continue;
        };
        let tx = tx.clone();
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let label = lookup(store.as_ref(), &pending).await;
            // The collector only stops once every sender is gone.
            let _ = tx.send(ResolvedReference { row, label }).await;
        });
        spawned += 1;
    }
    drop(tx);

    let mut applied = 0usize;
    while let Some(resolved) = rx.recv().await {
        if let Some(item) = rows.get_mut(resolved.row) {
            *item.reference_mut() = ReferenceCell::Label(resolved.label);
            applied += 1;
        }
    }
    if applied < spawned {
        tracing::warn!(spawned, applied, "Some reference lookups never reported back");
    }

    for item in &mut rows {
        item.reference_mut().settle();
    }
    rows
}

async fn lookup(store: &dyn DocumentStore, pending: &PendingReference) -> String {
    let found = match pending.kind {
        ReferenceKind::Contractor => ContractorRepo::find_by_id(store, &pending.id)
            .await
            .map(|record| record.map(|r| r.entity.label()).filter(|l| !l.is_empty())),
        ReferenceKind::Project => ProjectRepo::find_by_id(store, &pending.id)
            .await
            .map(|record| record.map(|r| r.entity.label())),
    };

    match found {
        Ok(Some(label)) => label,
        Ok(None) => {
            tracing::debug!(kind = ?pending.kind, id = %pending.id, "Reference not found");
            pending.fallback.clone()
        }
        Err(e) => {
            tracing::warn!(kind = ?pending.kind, id = %pending.id, error = %e, "Reference lookup failed");
            pending.fallback.clone()
        }
    }
}
