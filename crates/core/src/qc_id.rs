//! Citizen identifiers of the form `QC-NNNNN`.
//!
//! Generation is uniform over the five-digit space `10000..=99999`.
//! Uniqueness is not decided here: the store's conditional insert is the
//! gate, and callers retry with a fresh id on collision (see
//! [`MAX_QC_ID_ATTEMPTS`]).

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

pub const QC_ID_PREFIX: &str = "QC-";

/// Upper bound on generate-and-insert attempts before giving up.
pub const MAX_QC_ID_ATTEMPTS: usize = 25;

static QC_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^QC-[0-9]{5}$").expect("qcId pattern is a valid regex"));

/// Generate a random identifier such as `QC-48213`.
pub fn generate_qc_id() -> String {
    let number: u32 = rand::rng().random_range(10_000..100_000);
    format!("{QC_ID_PREFIX}{number}")
}

/// Returns `true` if `value` is `QC-` followed by exactly five digits.
pub fn is_valid_qc_id(value: &str) -> bool {
    QC_ID_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_match_pattern() {
        for _ in 0..500 {
            let id = generate_qc_id();
            assert!(is_valid_qc_id(&id), "{id} does not match QC-NNNNN");
        }
    }

    #[test]
    fn generated_ids_vary() {
        let ids: std::collections::HashSet<String> = (0..50).map(|_| generate_qc_id()).collect();
        assert!(ids.len() > 1);
    }

    #[test]
    fn pattern_rejects_near_misses() {
        assert!(is_valid_qc_id("QC-00001"));
        assert!(!is_valid_qc_id("QC-1234"));
        assert!(!is_valid_qc_id("QC-123456"));
        assert!(!is_valid_qc_id("qc-12345"));
        assert!(!is_valid_qc_id("QC-12a45"));
        assert!(!is_valid_qc_id(" QC-12345"));
    }
}
