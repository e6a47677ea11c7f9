//! Display formatting shared by registry rows and dashboard widgets.
//!
//! Currency is always pesos with grouped thousands; dates are always
//! `YYYY-MM-DD`. Stored dates come in several shapes (store-native
//! timestamps, RFC 3339 strings, bare calendar dates), so everything goes
//! through [`DateValue`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Prefix for every rendered amount.
pub const PESO_SIGN: char = '\u{20B1}';

/// Rendered in place of a date that is absent or cannot be parsed.
pub const DATE_PLACEHOLDER: &str = "--";

/// Maximum fraction digits kept when rendering an amount.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Render an amount as pesos: `₱1,234,567.5`.
///
/// Up to three fraction digits are kept (trailing zeros dropped). Non-finite
/// input renders as zero.
pub fn format_peso(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let scale = 10u128.pow(MAX_FRACTION_DIGITS);
    let scaled = (amount.abs() * scale as f64).round() as u128;
    let whole = scaled / scale;
    let fraction = scaled % scale;

    let mut out = String::new();
    out.push(PESO_SIGN);
    if amount < 0.0 && scaled != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(&whole.to_string()));
    if fraction != 0 {
        let digits = format!("{fraction:0width$}", width = MAX_FRACTION_DIGITS as usize);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Insert `,` every three digits from the right of an unsigned digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A date as it may appear in a stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// Store-native timestamp object.
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    /// RFC 3339 timestamp string.
    Timestamp(Timestamp),
    /// Anything else: usually a bare `YYYY-MM-DD` from a date input.
    Text(String),
}

impl DateValue {
    /// The current instant, truncated to whole seconds.
    ///
    /// Whole seconds keep the serialized form fixed-width, so stored
    /// timestamps order correctly as strings.
    pub fn now() -> Self {
        DateValue::Timestamp(Utc::now().trunc_subsecs(0))
    }

    /// Midnight UTC of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        DateValue::Timestamp(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
    }

    /// Best-effort conversion to a UTC instant.
    pub fn to_datetime(&self) -> Option<Timestamp> {
        match self {
            DateValue::Native {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            DateValue::Timestamp(ts) => Some(*ts),
            DateValue::Text(text) => parse_text(text),
        }
    }

    /// Best-effort conversion to a UTC calendar date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_datetime().map(|ts| ts.date_naive())
    }
}

fn parse_text(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(chrono::NaiveTime::MIN)))
}

/// Render a stored date as `YYYY-MM-DD`, or [`DATE_PLACEHOLDER`] when it is
/// missing or unparseable.
pub fn format_date(value: Option<&DateValue>) -> String {
    value
        .and_then(DateValue::to_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
}

/// Dashboard header label, e.g. `Saturday, Oct 17, 2026`.
pub fn format_today_label(today: NaiveDate) -> String {
    today.format("%A, %b %-d, %Y").to_string()
}
