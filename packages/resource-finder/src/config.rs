use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::loader::DataFormat;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::search::DEFAULT_SEARCH_THRESHOLD;

/// Public dataset location used when no URL is configured.
pub const DEFAULT_DATA_URL: &str = "https://nc-resource-finder.s3.amazonaws.com/resources.json";

/// Seconds before a dataset request is abandoned.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resource finder configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub data_url: String,
    /// Explicit payload format; inferred from `data_url` when unset.
    pub data_format: Option<DataFormat>,
    pub page_size: usize,
    pub search_threshold: f64,
    pub request_timeout_secs: u64,
    /// Map tile provider token, handed through to the presentation layer.
    pub mapbox_access_token: Option<String>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            data_format: None,
            page_size: DEFAULT_PAGE_SIZE,
            search_threshold: DEFAULT_SEARCH_THRESHOLD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            mapbox_access_token: None,
        }
    }
}

impl FinderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let data_format = get("RESOURCE_FINDER_DATA_FORMAT")
            .map(|raw| raw.parse::<DataFormat>())
            .transpose()
            .context("RESOURCE_FINDER_DATA_FORMAT must be csv or json")?;

        let page_size = match get("RESOURCE_FINDER_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("RESOURCE_FINDER_PAGE_SIZE must be a valid number")?,
            None => defaults.page_size,
        };
        if page_size == 0 {
            bail!("RESOURCE_FINDER_PAGE_SIZE must be at least 1");
        }

        let search_threshold = match get("RESOURCE_FINDER_SEARCH_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .context("RESOURCE_FINDER_SEARCH_THRESHOLD must be a number")?,
            None => defaults.search_threshold,
        };
        if !(0.0..=1.0).contains(&search_threshold) {
            bail!("RESOURCE_FINDER_SEARCH_THRESHOLD must be between 0 and 1");
        }

        let request_timeout_secs = match get("RESOURCE_FINDER_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("RESOURCE_FINDER_REQUEST_TIMEOUT_SECS must be a valid number")?,
            None => defaults.request_timeout_secs,
        };

        Ok(Self {
            data_url: get("RESOURCE_FINDER_DATA_URL").unwrap_or(defaults.data_url),
            data_format,
            page_size,
            search_threshold,
            request_timeout_secs,
            mapbox_access_token: get("MAPBOX_ACCESS_TOKEN"),
        })
    }

    /// Configured format, or the one implied by the URL.
    pub fn data_format(&self) -> DataFormat {
        self.data_format
            .unwrap_or_else(|| DataFormat::from_url(&self.data_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = FinderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, FinderConfig::default());
        assert_eq!(config.page_size, 18);
        assert_eq!(config.data_format(), DataFormat::Json);
    }

    #[test]
    fn test_reads_all_values() {
        let config = FinderConfig::from_lookup(lookup(&[
            ("RESOURCE_FINDER_DATA_URL", "https://data.example.org/export"),
            ("RESOURCE_FINDER_DATA_FORMAT", "CSV"),
            ("RESOURCE_FINDER_PAGE_SIZE", "24"),
            ("RESOURCE_FINDER_SEARCH_THRESHOLD", "0.5"),
            ("RESOURCE_FINDER_REQUEST_TIMEOUT_SECS", "5"),
            ("MAPBOX_ACCESS_TOKEN", "pk.test"),
        ]))
        .unwrap();

        assert_eq!(config.data_url, "https://data.example.org/export");
        assert_eq!(config.data_format(), DataFormat::Csv);
        assert_eq!(config.page_size, 24);
        assert_eq!(config.search_threshold, 0.5);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.mapbox_access_token.as_deref(), Some("pk.test"));
    }

    #[test]
    fn test_format_inferred_from_url() {
        let config = FinderConfig::from_lookup(lookup(&[(
            "RESOURCE_FINDER_DATA_URL",
            "https://data.example.org/resources.csv",
        )]))
        .unwrap();
        assert_eq!(config.data_format, None);
        assert_eq!(config.data_format(), DataFormat::Csv);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = FinderConfig::from_lookup(lookup(&[
            ("RESOURCE_FINDER_DATA_URL", "  "),
            ("MAPBOX_ACCESS_TOKEN", ""),
        ]))
        .unwrap();
        assert_eq!(config.data_url, DEFAULT_DATA_URL);
        assert_eq!(config.mapbox_access_token, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for pairs in [
            [("RESOURCE_FINDER_PAGE_SIZE", "0")],
            [("RESOURCE_FINDER_PAGE_SIZE", "lots")],
            [("RESOURCE_FINDER_SEARCH_THRESHOLD", "1.5")],
            [("RESOURCE_FINDER_DATA_FORMAT", "xml")],
            [("RESOURCE_FINDER_REQUEST_TIMEOUT_SECS", "-1")],
        ] {
            let err = FinderConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                err.to_string().contains(pairs[0].0),
                "error should name {}: {err}",
                pairs[0].0
            );
        }
    }
}
