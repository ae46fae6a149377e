//! Summary truncation to a byte budget.

/// Marker appended to truncated summaries.
const ELLIPSIS: &str = "...";

/// Truncate `body` so the result is at most `max_bytes` bytes.
///
/// Cuts on a char boundary. When anything is cut and the budget allows it,
/// the summary ends with `...` and still fits the budget.
pub fn truncate_summary(body: &str, max_bytes: usize) -> String {
    let body = body.trim();
    if body.len() <= max_bytes {
        return body.to_string();
    }

    let (keep, suffix) = if max_bytes > ELLIPSIS.len() {
        (max_bytes - ELLIPSIS.len(), ELLIPSIS)
    } else {
        (max_bytes, "")
    };

    let cut = floor_char_boundary(body, keep);
    let mut summary = String::with_capacity(cut + suffix.len());
    summary.push_str(body[..cut].trim_end());
    summary.push_str(suffix);
    summary
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        assert_eq!(truncate_summary("short", 200), "short");
    }

    #[test]
    fn exact_budget_unchanged() {
        let body = "a".repeat(20);
        assert_eq!(truncate_summary(&body, 20), body);
    }

    #[test]
    fn long_body_truncated_with_ellipsis_within_budget() {
        let body = "b".repeat(500);
        let summary = truncate_summary(&body, 200);
        assert_eq!(summary.len(), 200);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn multibyte_chars_not_split() {
        let body = "é".repeat(100); // 2 bytes each
        let summary = truncate_summary(&body, 10);
        assert!(summary.len() <= 10);
        assert!(summary.ends_with("..."));
        assert!(summary.trim_end_matches("...").chars().all(|c| c == 'é'));
    }

    #[test]
    fn tiny_budget_has_no_ellipsis() {
        let summary = truncate_summary("abcdef", 2);
        assert_eq!(summary, "ab");
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(truncate_summary("  padded  ", 200), "padded");
    }
}
