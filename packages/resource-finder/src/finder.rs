//! Caller-owned finder state.
//!
//! [`ResourceFinder`] holds everything the search screen needs between
//! interactions: the query, the active view, the current page and the county
//! combobox. Every change to the query or the view sends the user back to
//! page 1. Producing results is a pure read over a dataset snapshot.

use serde::Serialize;
use std::fmt;

use crate::categories::{category_label, category_position};
use crate::config::FinderConfig;
use crate::filter::filter_resources;
use crate::geography::GeographyIndex;
use crate::pagination::{
    page_window, paginate, total_pages, PageControls, PageLink, DEFAULT_PAGE_SIZE,
};
use crate::search::FuzzySearch;
use crate::types::{GeographyOption, Query, Resource};

// ============================================================================
// View and keys
// ============================================================================

/// How results are presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Map,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "List",
            ViewMode::Map => "Map",
        }
    }

    pub fn variants() -> &'static [ViewMode] {
        &[ViewMode::List, ViewMode::Map]
    }
}

/// Keys the county combobox reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountyKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Tab,
}

// ============================================================================
// Results
// ============================================================================

/// One page of results plus what the pagination controls need.
#[derive(Debug, Clone)]
pub struct FinderPage<'a> {
    pub items: Vec<&'a Resource>,
    pub total_results: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub links: Vec<PageLink>,
    pub controls: PageControls,
}

/// The "Showing N results..." line above the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub total: usize,
    /// Place name of the selected geography; `None` means statewide.
    pub place: Option<String>,
    /// Labels of the selected categories, in catalog order.
    pub categories: Vec<String>,
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} results. You are viewing resources in {}",
            self.total,
            self.place.as_deref().unwrap_or("North Carolina")
        )?;
        if !self.categories.is_empty() {
            write!(f, " that help you {}", self.categories.join(", "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Finder state
// ============================================================================

/// Search screen state between interactions.
///
/// Owned by the caller and driven by UI events; it never holds the dataset,
/// so one finder can be pointed at successive snapshots.
#[derive(Debug, Clone)]
pub struct ResourceFinder {
    query: Query,
    view: ViewMode,
    page: usize,
    page_size: usize,
    county_text: String,
    show_county_options: bool,
    highlighted: Option<usize>,
    geography: GeographyIndex,
}

impl Default for ResourceFinder {
    fn default() -> Self {
        Self::new(GeographyIndex::default())
    }
}

impl ResourceFinder {
    pub fn new(geography: GeographyIndex) -> Self {
        Self {
            query: Query::default(),
            view: ViewMode::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            county_text: String::new(),
            show_county_options: false,
            highlighted: None,
            geography,
        }
    }

    pub fn from_config(config: &FinderConfig, geography: GeographyIndex) -> Self {
        Self::new(geography).with_page_size(config.page_size)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn county_text(&self) -> &str {
        &self.county_text
    }

    pub fn show_county_options(&self) -> bool {
        self.show_county_options
    }

    /// Index into [`county_options`](Self::county_options) of the highlighted entry.
    pub fn highlighted_option(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn geography_index(&self) -> &GeographyIndex {
        &self.geography
    }

    // ------------------------------------------------------------------------
    // Query updates
    // ------------------------------------------------------------------------

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query.free_text = text.into();
        self.page = 1;
    }

    /// Typing in the county box. Emptying it drops the selected geography.
    pub fn set_county_text(&mut self, text: impl Into<String>) {
        self.county_text = text.into();
        self.show_county_options = true;
        self.highlighted = None;
        if self.county_text.is_empty() {
            self.query.geography = None;
        }
        self.page = 1;
    }

    /// Options matching the county box text.
    pub fn county_options(&self) -> Vec<&GeographyOption> {
        self.geography.find_by_query(&self.county_text)
    }

    /// Select a geography; selecting the current one clears it instead.
    pub fn select_geography(&mut self, option: GeographyOption) {
        let reselected = self
            .query
            .geography
            .as_ref()
            .is_some_and(|current| current.value == option.value);

        if reselected {
            self.query.geography = None;
            self.county_text.clear();
        } else {
            self.county_text = option.label.clone();
            self.query.geography = Some(option);
        }
        self.show_county_options = false;
        self.highlighted = None;
        self.page = 1;
    }

    pub fn clear_geography(&mut self) {
        self.query.geography = None;
        self.county_text.clear();
        self.highlighted = None;
        self.page = 1;
    }

    pub fn open_county_options(&mut self) {
        self.show_county_options = true;
    }

    /// Close the options list without selecting (click outside, Tab).
    pub fn close_county_options(&mut self) {
        self.show_county_options = false;
    }

    pub fn handle_county_key(&mut self, key: CountyKey) {
        let option_count = self.county_options().len();
        match key {
            CountyKey::ArrowDown => {
                self.highlighted = match self.highlighted {
                    None if option_count > 0 => Some(0),
                    Some(i) if i + 1 < option_count => Some(i + 1),
                    other => other,
                };
            }
            CountyKey::ArrowUp => {
                if let Some(i) = self.highlighted {
                    self.highlighted = Some(i.saturating_sub(1));
                }
            }
            CountyKey::Enter => {
                let chosen = self
                    .highlighted
                    .and_then(|i| self.county_options().get(i).map(|option| (*option).clone()));
                if let Some(option) = chosen {
                    self.select_geography(option);
                }
            }
            CountyKey::Tab => self.close_county_options(),
        }
    }

    pub fn toggle_category(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.query.categories.remove(&value) {
            self.query.categories.insert(value);
        }
        self.page = 1;
    }

    pub fn clear_categories(&mut self) {
        self.query.categories.clear();
        self.page = 1;
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            self.view = view;
            self.page = 1;
        }
    }

    /// Move to `page`, clamped to the pages available for `total_results`.
    pub fn set_page(&mut self, page: usize, total_results: usize) {
        let last = total_pages(total_results, self.page_size).max(1);
        self.page = page.clamp(1, last);
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    /// Every resource matching the query: search, then filter.
    pub fn matching<'a>(
        &self,
        resources: &'a [Resource],
        search: &FuzzySearch,
    ) -> Vec<&'a Resource> {
        let found = search.search(resources, &self.query.free_text);
        filter_resources(found, &self.query)
    }

    /// The current page of matching resources.
    pub fn results<'a>(&self, resources: &'a [Resource], search: &FuzzySearch) -> FinderPage<'a> {
        let matched = self.matching(resources, search);
        let pages = total_pages(matched.len(), self.page_size);
        FinderPage {
            items: paginate(&matched, self.page_size, self.page).to_vec(),
            total_results: matched.len(),
            total_pages: pages,
            current_page: self.page,
            links: page_window(self.page, pages),
            controls: PageControls::new(self.page, pages),
        }
    }

    pub fn summary(&self, total: usize) -> ResultSummary {
        let mut selected: Vec<&String> = self.query.categories.iter().collect();
        selected.sort_by_key(|value| category_position(value).unwrap_or(usize::MAX));

        ResultSummary {
            total,
            place: self.query.geography.as_ref().map(GeographyOption::display_name),
            categories: selected
                .into_iter()
                .map(|value| category_label(value).to_string())
                .collect(),
        }
    }
}
