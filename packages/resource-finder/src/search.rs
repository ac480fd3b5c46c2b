//! Fuzzy free-text search over resources
//!
//! Each field is scored two ways and the better score wins. The skim fuzzy
//! matcher handles partial and scattered matches ("lptop"); an edit distance
//! over the field's words handles typos and swapped letters ("labtop").
//! Both map onto a 0–1 distance so one tolerance knob controls how loose
//! matching is.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use strsim::normalized_damerau_levenshtein;

use crate::types::Resource;

/// Default tolerance: 0.0 accepts only whole-word matches, 1.0 accepts anything.
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.3;

/// A resource that matched a search, with its distance (lower = better).
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub resource: &'a Resource,
    pub distance: f64,
}

/// Fuzzy search across resource name, description, types and geography.
pub struct FuzzySearch {
    matcher: SkimMatcherV2,
    threshold: f64,
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FuzzySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzySearch")
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl FuzzySearch {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
            threshold: DEFAULT_SEARCH_THRESHOLD,
        }
    }

    /// Set the tolerance, clamped to `0.0..=1.0`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_nan() {
            DEFAULT_SEARCH_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Search resources, returning matches best first.
    ///
    /// Blank text returns the input unchanged and in order.
    pub fn search<'a, I>(&self, resources: I, text: &str) -> Vec<&'a Resource>
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        self.search_scored(resources, text)
            .into_iter()
            .map(|hit| hit.resource)
            .collect()
    }

    /// Search resources, returning matches with their distances, best first.
    ///
    /// Ties keep input order. Blank text yields every resource at distance 0.
    pub fn search_scored<'a, I>(&self, resources: I, text: &str) -> Vec<SearchHit<'a>>
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        let pattern = text.trim().to_lowercase();
        if pattern.is_empty() {
            return resources
                .into_iter()
                .map(|resource| SearchHit {
                    resource,
                    distance: 0.0,
                })
                .collect();
        }

        let reference = self.reference_score(&pattern);
        let mut hits: Vec<SearchHit<'a>> = resources
            .into_iter()
            .filter_map(|resource| {
                let distance = self.resource_distance(resource, &pattern, reference);
                (distance <= self.threshold).then_some(SearchHit { resource, distance })
            })
            .collect();

        // Sort by distance ascending (best matches first); sort_by is stable
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        tracing::debug!(query = %pattern, matches = hits.len(), "Fuzzy search complete");
        hits
    }

    /// Check if a single resource matches the text under the current threshold.
    pub fn matches(&self, resource: &Resource, text: &str) -> bool {
        let pattern = text.trim().to_lowercase();
        if pattern.is_empty() {
            return true;
        }
        let reference = self.reference_score(&pattern);
        self.resource_distance(resource, &pattern, reference) <= self.threshold
    }

    /// Score of the pattern matched whole at the start of a word.
    fn reference_score(&self, pattern: &str) -> i64 {
        self.matcher
            .fuzzy_match(&format!(" {pattern}"), pattern)
            .unwrap_or(1)
            .max(1)
    }

    fn resource_distance(&self, resource: &Resource, pattern: &str, reference: i64) -> f64 {
        searchable_fields(resource)
            .map(|field| self.field_distance(field, pattern, reference))
            .fold(1.0, f64::min)
    }

    fn field_distance(&self, field: &str, pattern: &str, reference: i64) -> f64 {
        let field = field.to_lowercase();
        let subsequence = match self.matcher.fuzzy_match(&field, pattern) {
            Some(score) => 1.0 - (score as f64 / reference as f64).clamp(0.0, 1.0),
            None => 1.0,
        };
        subsequence.min(typo_distance(&field, pattern))
    }
}

/// Edit distance between the pattern and the closest run of field words
/// with the same word count, as a 0–1 distance.
fn typo_distance(field: &str, pattern: &str) -> f64 {
    let pattern_words = words(pattern);
    if pattern_words.is_empty() {
        return 1.0;
    }
    let pattern = pattern_words.join(" ");

    words(field)
        .windows(pattern_words.len())
        .map(|run| 1.0 - normalized_damerau_levenshtein(&run.join(" "), &pattern))
        .fold(1.0, f64::min)
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect()
}

fn searchable_fields(resource: &Resource) -> impl Iterator<Item = &str> {
    std::iter::once(resource.name.as_str())
        .chain(resource.description.as_deref())
        .chain(resource.primary_type.iter().map(String::as_str))
        .chain(resource.geography.iter().map(String::as_str))
}
