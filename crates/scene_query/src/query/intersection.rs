//! Pairwise intersection query

use super::{NameOrdering, QueryFlags};
use crate::spatial::SpatialRegistry;
use std::cmp::Ordering;

/// Two objects whose bounds overlap; `first` precedes `second` under the
/// query's name ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntersectionPair {
    /// Name that orders first
    pub first: String,
    /// Name that orders second
    pub second: String,
}

impl IntersectionPair {
    /// Check whether this pair is `{a, b}` in either order
    pub fn is(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Ordered list of overlapping pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionResult {
    pairs: Vec<IntersectionPair>,
}

impl IntersectionResult {
    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when nothing overlaps
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the pairs in result order
    pub fn iter(&self) -> std::slice::Iter<'_, IntersectionPair> {
        self.pairs.iter()
    }

    /// The pairs as a slice
    pub fn pairs(&self) -> &[IntersectionPair] {
        &self.pairs
    }

    /// Check whether `{a, b}` is among the pairs
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.iter().any(|pair| pair.is(a, b))
    }

    /// Pairs as borrowed name tuples, convenient for comparisons
    pub fn as_tuples(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .map(|pair| (pair.first.as_str(), pair.second.as_str()))
            .collect()
    }
}

impl IntoIterator for IntersectionResult {
    type Item = IntersectionPair;
    type IntoIter = std::vec::IntoIter<IntersectionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a IntersectionResult {
    type Item = &'a IntersectionPair;
    type IntoIter = std::slice::Iter<'a, IntersectionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Finds every pair of registered objects whose bounds overlap
///
/// Boxes that only touch on a face, edge or corner count as overlapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionQuery {
    query_mask: QueryFlags,
    ordering: NameOrdering,
}

impl Default for IntersectionQuery {
    fn default() -> Self {
        Self {
            query_mask: QueryFlags::all(),
            ordering: NameOrdering::default(),
        }
    }
}

impl IntersectionQuery {
    /// Query every object with numeric-aware name ordering
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: only objects whose flags share a bit with `mask` take part
    pub fn with_query_mask(mut self, mask: QueryFlags) -> Self {
        self.query_mask = mask;
        self
    }

    /// Builder: set the name ordering of the result
    pub fn with_ordering(mut self, ordering: NameOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Replace the query mask
    pub fn set_query_mask(&mut self, mask: QueryFlags) {
        self.query_mask = mask;
    }

    /// Current query mask
    pub fn query_mask(&self) -> QueryFlags {
        self.query_mask
    }

    /// Name ordering applied to the result
    pub fn ordering(&self) -> NameOrdering {
        self.ordering
    }

    /// Run the query against the registry's current contents
    pub fn execute(&self, registry: &SpatialRegistry) -> IntersectionResult {
        let ordering = self.ordering;
        let mut pairs: Vec<IntersectionPair> = registry
            .index()
            .overlapping_pairs()
            .into_iter()
            .filter_map(|(a, b)| {
                let a = registry.object(a)?;
                let b = registry.object(b)?;
                if a.name == b.name
                    || !a.query_flags.matches(self.query_mask)
                    || !b.query_flags.matches(self.query_mask)
                {
                    return None;
                }
                let (first, second) = ordering.canonical_pair(&a.name, &b.name);
                Some(IntersectionPair {
                    first: first.to_string(),
                    second: second.to_string(),
                })
            })
            .collect();

        pairs.sort_by(|x, y| compare_pairs(ordering, x, y));
        pairs.dedup();

        log::debug!(
            "Intersection query over {} objects ({} index) found {} pairs",
            registry.len(),
            registry.index().name(),
            pairs.len()
        );
        IntersectionResult { pairs }
    }
}

fn compare_pairs(ordering: NameOrdering, x: &IntersectionPair, y: &IntersectionPair) -> Ordering {
    ordering
        .compare(&x.first, &y.first)
        .then_with(|| ordering.compare(&x.second, &y.second))
}
