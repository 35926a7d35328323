//! Pure helpers for play-marker bookkeeping.
//!
//! The played-orders history is a comma-joined string because that is what
//! lives in the `multi_line_text_field` metafield. These functions never
//! touch the network, which keeps them trivially testable.

use chrono::Utc;

/// Whether `order_id` already appears in a comma-joined history string.
///
/// Membership is exact string match after trimming each entry, so `"123"`
/// does not match `"1234"`.
pub fn history_contains(history: &str, order_id: &str) -> bool {
    history
        .split(',')
        .map(str::trim)
        .any(|entry| !entry.is_empty() && entry == order_id)
}

/// Append `order_id` to a comma-joined history string.
///
/// An empty or whitespace-only history becomes just the id; callers check
/// membership first, this does not dedupe.
pub fn append_history(history: &str, order_id: &str) -> String {
    let trimmed = history.trim();
    if trimmed.is_empty() {
        order_id.to_string()
    } else {
        format!("{trimmed},{order_id}")
    }
}

/// Today's date in UTC as `YYYY-MM-DD`, the per-day play marker.
pub fn today_utc_string() -> String {
    Utc::now().date_naive().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_history_contains_exact_match() {
        assert!(history_contains("1001,1002,1003", "1002"));
        assert!(history_contains("1001", "1001"));
    }

    #[test]
    fn test_history_contains_rejects_prefix_match() {
        assert!(!history_contains("1234,5678", "123"));
        assert!(!history_contains("123", "1234"));
    }

    #[test]
    fn test_history_contains_empty_history() {
        assert!(!history_contains("", "1001"));
        assert!(!history_contains("   ", "1001"));
    }

    #[test]
    fn test_history_contains_tolerates_spaces() {
        assert!(history_contains("1001, 1002 ,1003", "1002"));
    }

    #[test]
    fn test_append_history_to_empty() {
        assert_eq!(append_history("", "1001"), "1001");
        assert_eq!(append_history("  ", "1001"), "1001");
    }

    #[test]
    fn test_append_history_to_existing() {
        assert_eq!(append_history("1001", "1002"), "1001,1002");
        assert_eq!(append_history("1001,1002", "1003"), "1001,1002,1003");
    }

    #[test]
    fn test_today_utc_string_shape() {
        let today = today_utc_string();
        assert_eq!(today.len(), 10);
        assert_eq!(today.chars().filter(|c| *c == '-').count(), 2);
    }
}
