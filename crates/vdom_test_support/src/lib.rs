mod reorders;
mod rng;

pub use crate::reorders::{REORDERS_FORMAT_V1, ReorderCase, load_reorder_cases, minimal_moves};
pub use crate::rng::SweepRng;

#[cfg(feature = "vdom")]
pub mod keyed;

/// Round count for a randomized sweep, read from the environment variable `var`.
///
/// Unset, empty, `0`, `off` or `false` keeps the quick count. `1`, `on` or
/// `true` selects the stress count. Any other integer is taken as the count
/// itself.
pub fn sweep_rounds(var: &str, quick: usize, stress: usize) -> usize {
    let raw = std::env::var(var).unwrap_or_default();
    parse_rounds(raw.trim(), quick, stress)
        .unwrap_or_else(|| panic!("{var}={raw:?}: expected a flag or a round count"))
}

fn parse_rounds(raw: &str, quick: usize, stress: usize) -> Option<usize> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "0" | "off" | "false" => Some(quick),
        "1" | "on" | "true" => Some(stress),
        other => other.parse().ok(),
    }
}

fn line(lines: &[String], i: usize) -> &str {
    lines.get(i).map_or("<missing>", String::as_str)
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    let mismatch = (0..max).find(|&i| line(expected, i) != line(actual, i));
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for idx in start..end {
            let marker = if idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", idx + 1, line(expected, idx));
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", idx + 1, line(actual, idx));
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{diff_lines, parse_rounds};

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diff_points_at_first_mismatch() {
        let out = diff_lines(&lines(&["a", "b", "c"]), &lines(&["a", "x", "c"]));
        assert!(out.starts_with("first mismatch at line 2"));
        assert!(out.contains(">    2  expected: b"));
        assert!(out.contains(">    2    actual: x"));
    }

    #[test]
    fn diff_reports_length_only_difference() {
        let out = diff_lines(&lines(&["a"]), &lines(&["a", "b"]));
        assert!(out.contains("actual: b"));
        assert!(out.contains("expected: <missing>"));
    }

    #[test]
    fn round_count_accepts_flags_and_numbers() {
        assert_eq!(parse_rounds("", 10, 500), Some(10));
        assert_eq!(parse_rounds("off", 10, 500), Some(10));
        assert_eq!(parse_rounds("TRUE", 10, 500), Some(500));
        assert_eq!(parse_rounds("1", 10, 500), Some(500));
        assert_eq!(parse_rounds("42", 10, 500), Some(42));
        assert_eq!(parse_rounds("lots", 10, 500), None);
    }
}
