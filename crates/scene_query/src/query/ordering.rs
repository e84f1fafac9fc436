//! Deterministic ordering of object names in query results

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How object names are ordered in query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameOrdering {
    /// Names that parse as integers compare by value and come first; other
    /// names follow in byte order.
    #[default]
    Numeric,
    /// Plain byte order (`"10" < "9"`)
    Lexical,
}

impl NameOrdering {
    /// Compare two names. Equal only when the names are identical.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexical => a.cmp(b),
            Self::Numeric => match (a.parse::<i64>(), b.parse::<i64>()) {
                // "7" and "07" tie numerically; fall back to bytes
                (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            },
        }
    }

    /// Return `(a, b)` with the smaller name first
    pub fn canonical_pair<'a>(self, a: &'a str, b: &'a str) -> (&'a str, &'a str) {
        if self.compare(a, b) == Ordering::Greater {
            (b, a)
        } else {
            (a, b)
        }
    }
}
