//! Double-submit protection.
//!
//! A session may have one submission of a given form in flight at a time.
//! A second submit of the same form while the first is still being
//! processed is refused with a conflict instead of writing a duplicate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use qtrace_core::error::CoreError;

/// Set of `(session, form)` pairs currently being processed.
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    in_flight: Mutex<HashSet<(String, String)>>,
}

/// Held for the duration of one submission. Dropping it frees the slot,
/// whether the submission succeeded, failed or was cancelled.
#[derive(Debug)]
pub struct SubmissionTicket {
    guard: Arc<SubmissionGuard>,
    key: (String, String),
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `form` in `session`.
    pub fn begin(
        self: &Arc<Self>,
        session: &str,
        form: impl Into<String>,
    ) -> Result<SubmissionTicket, CoreError> {
        let key = (session.to_string(), form.into());
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| CoreError::Internal("submission guard poisoned".into()))?;

        if !in_flight.insert(key.clone()) {
            return Err(CoreError::Conflict(format!(
                "A submission of '{}' is already in progress",
                key.1
            )));
        }
        Ok(SubmissionTicket {
            guard: Arc::clone(self),
            key,
        })
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().map(|set| set.len()).unwrap_or_default()
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.guard.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}
