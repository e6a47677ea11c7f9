//! Dashboard alert counts over the project collection.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::project::is_delayed;

/// A project is "due soon" when its end date falls within this many days
/// of today, both ends inclusive.
pub const DUE_SOON_WINDOW_DAYS: i64 = 14;

pub const ALL_CLEAR: &str = "All clear. No alerts.";

/// Returns `true` if `end` is in `[today, today + DUE_SOON_WINDOW_DAYS]`.
pub fn is_due_soon(end: NaiveDate, today: NaiveDate) -> bool {
    end >= today && end <= today + Duration::days(DUE_SOON_WINDOW_DAYS)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub delayed: usize,
    pub due_soon: usize,
}

impl AlertCounts {
    /// Fold one project into the counts.
    pub fn observe(&mut self, status: &str, end: Option<NaiveDate>, today: NaiveDate) {
        if is_delayed(status) {
            self.delayed += 1;
        }
        if end.is_some_and(|end| is_due_soon(end, today)) {
            self.due_soon += 1;
        }
    }

    /// Human-readable alert lines; a single all-clear line when both counts are zero.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.delayed > 0 {
            out.push(format!("{} project(s) marked Delayed.", self.delayed));
        }
        if self.due_soon > 0 {
            out.push(format!(
                "{} project(s) ending within {DUE_SOON_WINDOW_DAYS} days.",
                self.due_soon
            ));
        }
        if out.is_empty() {
            out.push(ALL_CLEAR.to_string());
        }
        out
    }
}
