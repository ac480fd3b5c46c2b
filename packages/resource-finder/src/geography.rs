//! Static geography reference data.
//!
//! The index holds every selectable location filter value in a fixed
//! definition order: the North Carolina counties alphabetically, followed by
//! any zip codes appended by the caller.

use std::collections::BTreeSet;

use crate::normalize::is_zip_code;
use crate::types::{GeographyKind, GeographyOption, Resource};

/// North Carolina counties, in the order they are offered for selection.
pub const NORTH_CAROLINA_COUNTIES: [&str; 100] = [
    "Alamance",
    "Alexander",
    "Alleghany",
    "Anson",
    "Ashe",
    "Avery",
    "Beaufort",
    "Bertie",
    "Bladen",
    "Brunswick",
    "Buncombe",
    "Burke",
    "Cabarrus",
    "Caldwell",
    "Camden",
    "Carteret",
    "Caswell",
    "Catawba",
    "Chatham",
    "Cherokee",
    "Chowan",
    "Clay",
    "Cleveland",
    "Columbus",
    "Craven",
    "Cumberland",
    "Currituck",
    "Dare",
    "Davidson",
    "Davie",
    "Duplin",
    "Durham",
    "Edgecombe",
    "Forsyth",
    "Franklin",
    "Gaston",
    "Gates",
    "Graham",
    "Granville",
    "Greene",
    "Guilford",
    "Halifax",
    "Harnett",
    "Haywood",
    "Henderson",
    "Hertford",
    "Hoke",
    "Hyde",
    "Iredell",
    "Jackson",
    "Johnston",
    "Jones",
    "Lee",
    "Lenoir",
    "Lincoln",
    "Macon",
    "Madison",
    "Martin",
    "McDowell",
    "Mecklenburg",
    "Mitchell",
    "Montgomery",
    "Moore",
    "Nash",
    "New Hanover",
    "Northampton",
    "Onslow",
    "Orange",
    "Pamlico",
    "Pasquotank",
    "Pender",
    "Perquimans",
    "Person",
    "Pitt",
    "Polk",
    "Randolph",
    "Richmond",
    "Robeson",
    "Rockingham",
    "Rowan",
    "Rutherford",
    "Sampson",
    "Scotland",
    "Stanly",
    "Stokes",
    "Surry",
    "Swain",
    "Transylvania",
    "Tyrrell",
    "Union",
    "Vance",
    "Wake",
    "Warren",
    "Washington",
    "Watauga",
    "Wayne",
    "Wilkes",
    "Wilson",
    "Yadkin",
    "Yancey",
];

/// Lookup over the selectable counties and zip codes.
#[derive(Debug, Clone)]
pub struct GeographyIndex {
    options: Vec<GeographyOption>,
}

impl Default for GeographyIndex {
    fn default() -> Self {
        Self::north_carolina()
    }
}

impl GeographyIndex {
    /// Index over the 100 North Carolina counties.
    pub fn north_carolina() -> Self {
        Self::from_counties(NORTH_CAROLINA_COUNTIES)
    }

    pub fn from_counties<I, S>(counties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self {
            options: Vec::new(),
        };
        for county in counties {
            index.push(GeographyOption::county(county));
        }
        index
    }

    /// Append zip code entries after the existing options.
    ///
    /// Values that are not 5-digit zip codes, or that are already present,
    /// are skipped.
    pub fn with_zip_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in codes {
            let code = code.as_ref().trim();
            if is_zip_code(code) {
                self.push(GeographyOption::zip(code));
            } else {
                tracing::debug!(code, "Skipping value that is not a zip code");
            }
        }
        self
    }

    fn push(&mut self, option: GeographyOption) {
        if self.get(&option.value).is_none() {
            self.options.push(option);
        }
    }

    /// Case-insensitive substring match over labels, in definition order.
    ///
    /// An empty query returns every option.
    pub fn find_by_query(&self, text: &str) -> Vec<&GeographyOption> {
        let needle = text.trim().to_lowercase();
        self.options
            .iter()
            .filter(|option| option.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Exact lookup by option value.
    pub fn get(&self, value: &str) -> Option<&GeographyOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn options(&self) -> &[GeographyOption] {
        &self.options
    }

    pub fn counties(&self) -> impl Iterator<Item = &GeographyOption> {
        self.options
            .iter()
            .filter(|option| option.kind == GeographyKind::County)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Zip codes referenced by a dataset's geography values, ascending.
pub fn zip_codes_in(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .flat_map(|r| r.geography.iter())
        .filter(|g| is_zip_code(g))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
