//! Normalizes a single tabell cell to an hour count.

/// Parses one tabell cell into an hour count.
///
/// Tabell cells carry either numeric hours or domain codes (`DOF`, `ALP`,
/// `TER`, ...) that mean "not a worked day" for reconciliation purposes.
/// Unknown text is treated as zero on purpose — the diff column is what
/// surfaces the discrepancy, not a parse error.
pub fn parse_hours(cell: &str) -> f64 {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }
    // Half-merged cells emit a trailing "(" for shifts crossing cell
    // boundaries, e.g. "10(".
    let stripped = trimmed.trim_end_matches('(');
    let normalized = stripped.replace(',', ".");
    normalized.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_number() {
        assert_eq!(parse_hours("8"), 8.0);
        assert_eq!(parse_hours("8.5"), 8.5);
    }

    #[test]
    fn european_decimal_comma() {
        assert_eq!(parse_hours("8,5"), 8.5);
    }

    #[test]
    fn empty_or_dash_is_zero() {
        assert_eq!(parse_hours(""), 0.0);
        assert_eq!(parse_hours("   "), 0.0);
        assert_eq!(parse_hours("-"), 0.0);
    }

    #[test]
    fn trailing_open_paren_is_stripped() {
        assert_eq!(parse_hours("10("), 10.0);
    }

    #[test]
    fn leading_and_trailing_whitespace_is_trimmed() {
        assert_eq!(parse_hours("  7.5  "), 7.5);
    }

    #[test]
    fn unknown_text_code_is_zero() {
        assert_eq!(parse_hours("DOF"), 0.0);
        assert_eq!(parse_hours("ALP"), 0.0);
        assert_eq!(parse_hours("TER"), 0.0);
    }
}
