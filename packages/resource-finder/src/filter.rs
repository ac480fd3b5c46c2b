//! Structured filtering by geography and category.
//!
//! Pure and order-preserving: the output is always a subsequence of the
//! input. Free-text matching lives in [`crate::search`].

use crate::types::{Query, Resource};

/// Keep the resources that satisfy `query`'s geography AND category
/// constraints, in input order.
///
/// Accepts anything that yields `&Resource`, so it composes directly over
/// both a loaded slice and the output of a search.
pub fn filter_resources<'a, I>(resources: I, query: &Query) -> Vec<&'a Resource>
where
    I: IntoIterator<Item = &'a Resource>,
{
    resources
        .into_iter()
        .filter(|resource| query.matches(resource))
        .collect()
}
