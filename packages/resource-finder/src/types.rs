//! Domain types shared by the loader, the filter engine and the finder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::normalize::with_https_prefix;

// ============================================================================
// Resources
// ============================================================================

/// Longitude/latitude pair for a resource with a known location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// One directory entry.
///
/// `name` is the display key and is never blank. `geography` and
/// `primary_type` are already normalized (trimmed, de-duplicated, source
/// order). Every other field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub geography: Vec<String>,
    #[serde(default)]
    pub primary_type: Vec<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub map_link: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Resource {
    /// Create a resource with only a name; use the `with_*` builders for the rest.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geography: Vec::new(),
            primary_type: Vec::new(),
            website: None,
            description: None,
            address: None,
            map_link: None,
            coordinates: None,
        }
    }

    pub fn with_geography<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.geography = crate::normalize::normalize_list(values);
        self
    }

    pub fn with_primary_type<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.primary_type = crate::normalize::normalize_list(values);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_coordinates(mut self, lon: f64, lat: f64) -> Self {
        self.coordinates = Some(Coordinates { lon, lat });
        self
    }

    /// Website as a navigable URL, `https://` added when the scheme is missing.
    pub fn website_url(&self) -> Option<String> {
        self.website.as_deref().map(with_https_prefix)
    }

    pub fn serves_geography(&self, value: &str) -> bool {
        self.geography.iter().any(|g| g == value)
    }

    pub fn has_any_type(&self, categories: &BTreeSet<String>) -> bool {
        self.primary_type.iter().any(|t| categories.contains(t))
    }
}

// ============================================================================
// Filter options
// ============================================================================

/// Whether a geography option names a county or a zip code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeographyKind {
    County,
    Zip,
}

/// A selectable location filter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeographyOption {
    pub value: String,
    pub label: String,
    pub kind: GeographyKind,
}

impl GeographyOption {
    pub fn county(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            value: name,
            kind: GeographyKind::County,
        }
    }

    pub fn zip(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            label: code.clone(),
            value: code,
            kind: GeographyKind::Zip,
        }
    }

    /// Human-readable place name used in result summaries.
    pub fn display_name(&self) -> String {
        match self.kind {
            GeographyKind::County => format!("{} County", self.label),
            GeographyKind::Zip => format!("zip code {}", self.label),
        }
    }
}

/// A selectable category filter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

// ============================================================================
// Query
// ============================================================================

/// The current filter state, owned by the caller.
///
/// An empty `free_text`, a `None` geography and an empty category set each
/// mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub free_text: String,
    pub geography: Option<GeographyOption>,
    pub categories: BTreeSet<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = text.into();
        self
    }

    pub fn with_geography(mut self, geography: GeographyOption) -> Self {
        self.geography = Some(geography);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// True when neither geography nor categories constrain results.
    pub fn is_unconstrained(&self) -> bool {
        self.geography.is_none() && self.categories.is_empty()
    }

    /// Structured-filter predicate (geography AND category). Free text is not
    /// considered here.
    pub fn matches(&self, resource: &Resource) -> bool {
        let geography_match = self
            .geography
            .as_ref()
            .map_or(true, |g| resource.serves_geography(&g.value));
        let category_match =
            self.categories.is_empty() || resource.has_any_type(&self.categories);
        geography_match && category_match
    }
}
