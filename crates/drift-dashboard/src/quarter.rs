//! Chronological ordering of fiscal quarter labels
//!
//! Upstream services label quarters as `2024Q1`, while drift snapshots have
//! been observed using `2024-Q1`. Both spellings parse to the same key so the
//! aligner and the presentation layer agree on which quarter is which.

use std::cmp::Ordering;

/// Sort key for a quarter label
///
/// Parsed labels order by `(year, quarter)`. Bare row numbers, as sent by
/// services that never attached a date index, follow in numeric order. Any
/// other label sorts last, lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuarterKey {
    Parsed { year: u16, quarter: u8 },
    Index(u64),
    Raw(String),
}

impl QuarterKey {
    pub fn parse(label: &str) -> Self {
        if let Some(key) = Self::parse_known(label) {
            return key;
        }

        let label = label.trim();
        if label.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = label.parse() {
                return QuarterKey::Index(index);
            }
        }
        QuarterKey::Raw(label.to_string())
    }

    fn parse_known(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        let (year, rest) = label.split_at_checked(4)?;
        if !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let rest = rest
            .strip_prefix('-')
            .or_else(|| rest.strip_prefix(' '))
            .unwrap_or(rest);
        let &[digit @ b'1'..=b'4'] = rest.strip_prefix('Q')?.as_bytes() else {
            return None;
        };

        Some(QuarterKey::Parsed {
            year: year.parse().ok()?,
            quarter: digit - b'0',
        })
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, QuarterKey::Parsed { .. })
    }
}

impl Ord for QuarterKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                QuarterKey::Parsed { year, quarter },
                QuarterKey::Parsed {
                    year: other_year,
                    quarter: other_quarter,
                },
            ) => (year, quarter).cmp(&(other_year, other_quarter)),
            (QuarterKey::Index(a), QuarterKey::Index(b)) => a.cmp(b),
            (QuarterKey::Raw(a), QuarterKey::Raw(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl QuarterKey {
    fn rank(&self) -> u8 {
        match self {
            QuarterKey::Parsed { .. } => 0,
            QuarterKey::Index(_) => 1,
            QuarterKey::Raw(_) => 2,
        }
    }
}

impl PartialOrd for QuarterKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whether two labels name the same quarter
pub fn same_quarter(a: &str, b: &str) -> bool {
    QuarterKey::parse(a) == QuarterKey::parse(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            QuarterKey::parse("2024Q1"),
            QuarterKey::Parsed {
                year: 2024,
                quarter: 1
            }
        );
        assert_eq!(QuarterKey::parse("2023-Q3"), QuarterKey::parse("2023Q3"));
        assert_eq!(QuarterKey::parse("2023 q3"), QuarterKey::parse("2023Q3"));
        assert!(!QuarterKey::parse("2024Q5").is_parsed());
        assert!(!QuarterKey::parse("FY2024").is_parsed());
    }

    #[test]
    fn test_quarter_digit_is_exact() {
        assert!(!QuarterKey::parse("2024Q+1").is_parsed());
        assert!(!QuarterKey::parse("2024Q01").is_parsed());
        assert!(!QuarterKey::parse("2024Q0").is_parsed());
        assert!(!QuarterKey::parse("2024Q").is_parsed());
        assert_ne!(QuarterKey::parse("2024Q+1"), QuarterKey::parse("2024Q1"));
    }

    #[test]
    fn test_chronological_order() {
        let mut labels = vec!["2024Q2", "2023-Q4", "2024-Q1", "2023Q1"];
        labels.sort_by_key(|label| QuarterKey::parse(label));
        assert_eq!(labels, vec!["2023Q1", "2023-Q4", "2024-Q1", "2024Q2"]);
    }

    #[test]
    fn test_unparsed_labels_sort_last() {
        assert!(QuarterKey::parse("2030Q4") < QuarterKey::parse("1999-H1"));
        assert!(QuarterKey::parse("A") < QuarterKey::parse("B"));
    }

    #[test]
    fn test_row_numbers_sort_numerically() {
        assert_eq!(QuarterKey::parse(" 10 "), QuarterKey::Index(10));
        assert!(QuarterKey::parse("2") < QuarterKey::parse("10"));
        assert!(QuarterKey::parse("2030Q4") < QuarterKey::parse("0"));
        assert!(QuarterKey::parse("99") < QuarterKey::parse("FY2024"));
        assert!(!QuarterKey::parse("+1").is_parsed());
        assert_eq!(QuarterKey::parse("+1"), QuarterKey::Raw("+1".to_string()));
    }

    #[test]
    fn test_same_quarter() {
        assert!(same_quarter("2023-Q3", "2023Q3"));
        assert!(!same_quarter("2023Q3", "2023Q4"));
    }
}
