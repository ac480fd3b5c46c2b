//! Dataset loader.
//!
//! Fetches the resource list from a static file host and turns it into typed,
//! normalized [`Resource`] records. The payload format is chosen by
//! configuration or by the URL's extension, never by response headers.
//!
//! # Example
//!
//! ```rust,ignore
//! use resource_finder::DatasetLoader;
//!
//! let loader = DatasetLoader::new("https://example.org/resources.csv");
//! let resources = loader.load().await?;
//! println!("{} resources", resources.len());
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::config::FinderConfig;
use crate::error::{FinderError, Result};
use crate::normalize::{non_blank, normalize_list, parse_coordinate, split_delimited};
use crate::types::{Coordinates, Resource};

// ============================================================================
// Format
// ============================================================================

/// Wire format of the dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Pick the format from the URL path: `.csv` is CSV, anything else JSON.
    pub fn from_url(url: &str) -> Self {
        let path = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed.path().to_ascii_lowercase(),
            Err(_) => url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase(),
        };
        if path.ends_with(".csv") {
            DataFormat::Csv
        } else {
            DataFormat::Json
        }
    }
}

impl FromStr for DataFormat {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            other => Err(FinderError::Config(format!(
                "unknown data format '{other}' (expected csv or json)"
            ))),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Csv => f.write_str("csv"),
            DataFormat::Json => f.write_str("json"),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Outcome of parsing a payload: the kept resources, sorted by name, and how
/// many rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedDataset {
    pub resources: Vec<Resource>,
    pub skipped: usize,
}

/// Row fields before normalization, shared by the CSV and JSON paths.
#[derive(Debug, Default)]
struct RawRow {
    name: Option<String>,
    geography: Vec<String>,
    primary_type: Vec<String>,
    website: Option<String>,
    description: Option<String>,
    address: Option<String>,
    map_link: Option<String>,
    lon: Option<f64>,
    lat: Option<f64>,
}

impl RawRow {
    /// `None` when the row has no usable name.
    fn into_resource(self) -> Option<Resource> {
        let name = non_blank(self.name.as_deref())?;
        let coordinates = match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some(Coordinates { lon, lat }),
            _ => None,
        };
        Some(Resource {
            name,
            geography: self.geography,
            primary_type: self.primary_type,
            website: non_blank(self.website.as_deref()),
            description: non_blank(self.description.as_deref()),
            address: non_blank(self.address.as_deref()),
            map_link: non_blank(self.map_link.as_deref()),
            coordinates,
        })
    }
}

/// Parse a dataset payload.
///
/// Individual rows that fail to parse or have no name are skipped; only a
/// payload that cannot be read at all is an error.
pub fn parse_dataset(bytes: &[u8], format: DataFormat) -> Result<ParsedDataset> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let rows = match format {
        DataFormat::Csv => parse_csv_rows(bytes)?,
        DataFormat::Json => parse_json_rows(bytes)?,
    };

    let mut dataset = ParsedDataset::default();
    for (index, row) in rows.into_iter().enumerate() {
        match row.and_then(|raw| raw.into_resource().ok_or_else(|| "missing name".to_string())) {
            Ok(resource) => dataset.resources.push(resource),
            Err(reason) => {
                warn!(row = index + 1, reason = %reason, "Skipping dataset row");
                dataset.skipped += 1;
            }
        }
    }

    // Stable sort so identical data always paginates identically
    dataset.resources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(dataset)
}

type RowResult = std::result::Result<RawRow, String>;

// ----------------------------------------------------------------------------
// CSV
// ----------------------------------------------------------------------------

/// Recognized CSV columns (lower-cased header -> field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Name,
    Geography,
    PrimaryType,
    Website,
    Description,
    Address,
    MapLink,
    Longitude,
    Latitude,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Column::Name),
            "geography" => Some(Column::Geography),
            "primary_type" | "primary_filter" | "type" => Some(Column::PrimaryType),
            "website" => Some(Column::Website),
            "description" => Some(Column::Description),
            "address_geocode" | "address" => Some(Column::Address),
            "googlemaps_link" | "map_link" => Some(Column::MapLink),
            "long" | "lon" | "longitude" => Some(Column::Longitude),
            "lat" | "latitude" => Some(Column::Latitude),
            _ => None,
        }
    }
}

fn parse_csv_rows(bytes: &[u8]) -> Result<Vec<RowResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| FinderError::Parse(format!("invalid CSV header row: {e}")))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(FinderError::Parse("CSV payload has no header row".to_string()));
    }

    // First occurrence of a column wins
    let mut columns: HashMap<Column, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(column) = Column::from_header(header) {
            columns.entry(column).or_insert(idx);
        }
    }
    if !columns.contains_key(&Column::Name) {
        return Err(FinderError::Parse(
            "CSV header row has no 'name' column".to_string(),
        ));
    }

    let rows = reader
        .records()
        .map(|record| -> RowResult {
            let record = record.map_err(|e| e.to_string())?;
            let cell = |column: Column| {
                columns
                    .get(&column)
                    .and_then(|idx| record.get(*idx))
                    .filter(|value| !value.is_empty())
            };
            Ok(RawRow {
                name: cell(Column::Name).map(str::to_string),
                geography: cell(Column::Geography)
                    .map(split_delimited)
                    .unwrap_or_default(),
                primary_type: cell(Column::PrimaryType)
                    .map(split_delimited)
                    .unwrap_or_default(),
                website: cell(Column::Website).map(str::to_string),
                description: cell(Column::Description).map(str::to_string),
                address: cell(Column::Address).map(str::to_string),
                map_link: cell(Column::MapLink).map(str::to_string),
                lon: cell(Column::Longitude).and_then(parse_coordinate),
                lat: cell(Column::Latitude).and_then(parse_coordinate),
            })
        })
        .collect();
    Ok(rows)
}

// ----------------------------------------------------------------------------
// JSON
// ----------------------------------------------------------------------------

/// One entry of a list-valued field. Zip codes often arrive as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListValue {
    Text(String),
    Number(serde_json::Number),
}

impl ListValue {
    fn into_text(self) -> String {
        match self {
            ListValue::Text(value) => value,
            ListValue::Number(value) => value.to_string(),
        }
    }
}

/// A list-valued field that may arrive as one delimited value or an array.
/// Null array entries are dropped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(ListValue),
    Many(Vec<Option<ListValue>>),
}

impl OneOrMany {
    fn normalize(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => split_delimited(&value.into_text()),
            OneOrMany::Many(values) => {
                normalize_list(values.into_iter().flatten().map(ListValue::into_text))
            }
        }
    }
}

/// A coordinate that may arrive as a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_coordinate(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Scalar::Text(value) => parse_coordinate(value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(default, alias = "Geography")]
    geography: Option<OneOrMany>,
    #[serde(
        default,
        alias = "primaryType",
        alias = "Primary_Filter",
        alias = "Type"
    )]
    primary_type: Option<OneOrMany>,
    #[serde(default, alias = "Website")]
    website: Option<String>,
    #[serde(default, alias = "Description")]
    description: Option<String>,
    #[serde(default, alias = "address")]
    address_geocode: Option<String>,
    #[serde(default, alias = "mapLink")]
    googlemaps_link: Option<String>,
    #[serde(default, alias = "lon", alias = "longitude")]
    long: Option<Scalar>,
    #[serde(default, alias = "latitude")]
    lat: Option<Scalar>,
}

impl From<JsonRow> for RawRow {
    fn from(row: JsonRow) -> Self {
        RawRow {
            name: row.name,
            geography: row.geography.map(OneOrMany::normalize).unwrap_or_default(),
            primary_type: row
                .primary_type
                .map(OneOrMany::normalize)
                .unwrap_or_default(),
            website: row.website,
            description: row.description,
            address: row.address_geocode,
            map_link: row.googlemaps_link,
            lon: row.long.as_ref().and_then(Scalar::as_coordinate),
            lat: row.lat.as_ref().and_then(Scalar::as_coordinate),
        }
    }
}

fn parse_json_rows(bytes: &[u8]) -> Result<Vec<RowResult>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| FinderError::Parse(format!("invalid JSON payload: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(FinderError::Parse(
            "expected a JSON array of resources".to_string(),
        ));
    };

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<JsonRow>(item)
                .map(RawRow::from)
                .map_err(|e| e.to_string())
        })
        .collect())
}

// ============================================================================
// Loader
// ============================================================================

/// Fetches and parses the dataset from a remote URL.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: reqwest::Client,
    url: String,
    format: DataFormat,
}

impl DatasetLoader {
    /// Loader for `url`, format inferred from its extension.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            client: reqwest::Client::new(),
            format: DataFormat::from_url(&url),
            url,
        }
    }

    /// Loader built from configuration, with its format override and timeout.
    pub fn from_config(config: &FinderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FinderError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.data_url.clone(),
            format: config.data_format(),
        })
    }

    pub fn with_format(mut self, format: DataFormat) -> Self {
        self.format = format;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// Fetch the dataset and return its resources sorted by name.
    pub async fn load(&self) -> Result<Vec<Resource>> {
        Ok(self.fetch().await?.resources)
    }

    /// Fetch the dataset, keeping the count of skipped rows.
    #[instrument(skip(self), fields(url = %self.url, format = %self.format))]
    pub async fn fetch(&self) -> Result<ParsedDataset> {
        info!("Fetching resource dataset");

        let resp = self.client.get(&self.url).send().await.map_err(|e| {
            error!(error = %e, "Dataset request failed");
            FinderError::from(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Dataset host returned an error");
            return Err(FinderError::Fetch {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read dataset body");
            FinderError::from(e)
        })?;

        let dataset = parse_dataset(&bytes, self.format).map_err(|e| {
            error!(error = %e, "Failed to parse dataset");
            e
        })?;
        info!(
            resources = dataset.resources.len(),
            skipped = dataset.skipped,
            "Dataset loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(dataset: &ParsedDataset) -> Vec<&str> {
        dataset.resources.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_format_from_url() {
        assert_eq!(
            DataFormat::from_url("https://host/data/resources.csv"),
            DataFormat::Csv
        );
        assert_eq!(
            DataFormat::from_url("https://host/resources.CSV?v=2"),
            DataFormat::Csv
        );
        assert_eq!(
            DataFormat::from_url("https://host/resources.json"),
            DataFormat::Json
        );
        assert_eq!(DataFormat::from_url("https://host/export"), DataFormat::Json);
        assert_eq!(DataFormat::from_url("local/resources.csv#top"), DataFormat::Csv);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!(" json ".parse::<DataFormat>().unwrap(), DataFormat::Json);
        assert!("xml".parse::<DataFormat>().is_err());
    }

    #[test]
    fn test_parse_csv_recommended_columns() {
        let csv = concat!(
            "name,geography,primary_type,website,description,",
            "address_geocode,googlemaps_link,long,lat\n",
            "Wake Library,\"Wake, 27601\",\"Device Access, Digital Skills\",",
            "wakegov.com/libraries,Laptops,\"1 Main St, Raleigh\",",
            "https://maps.example/1,-78.64,35.78\n",
        );
        let dataset = parse_dataset(csv.as_bytes(), DataFormat::Csv).unwrap();
        assert_eq!(dataset.skipped, 0);
        let r = &dataset.resources[0];
        assert_eq!(r.name, "Wake Library");
        assert_eq!(r.geography, vec!["Wake", "27601"]);
        assert_eq!(r.primary_type, vec!["Device Access", "Digital Skills"]);
        assert_eq!(r.website_url().as_deref(), Some("https://wakegov.com/libraries"));
        assert_eq!(r.address.as_deref(), Some("1 Main St, Raleigh"));
        assert_eq!(r.map_link.as_deref(), Some("https://maps.example/1"));
        assert_eq!(r.coordinates, Some(Coordinates { lon: -78.64, lat: 35.78 }));
    }

    #[test]
    fn test_parse_csv_drops_rows_without_name_and_sorts() {
        let csv = "Name,Geography,Extra\nzeta,Wake,x\n,Durham,y\nAlpha,Orange,z\nbeta,,\n";
        let dataset = parse_dataset(csv.as_bytes(), DataFormat::Csv).unwrap();
        assert_eq!(names(&dataset), vec!["Alpha", "beta", "zeta"]);
        assert_eq!(dataset.skipped, 1);
        assert!(dataset.resources[1].geography.is_empty());
    }

    #[test]
    fn test_parse_csv_partial_coordinates_are_absent() {
        let csv = "name,long,lat\nA,-78.6,\nB,east,35.1\n";
        let dataset = parse_dataset(csv.as_bytes(), DataFormat::Csv).unwrap();
        assert!(dataset.resources.iter().all(|r| r.coordinates.is_none()));
    }

    #[test]
    fn test_parse_csv_without_name_column_fails() {
        let csv = "title,geography\nA,Wake\n";
        assert!(matches!(
            parse_dataset(csv.as_bytes(), DataFormat::Csv),
            Err(FinderError::Parse(_))
        ));
        assert!(matches!(
            parse_dataset(b"", DataFormat::Csv),
            Err(FinderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_csv_strips_bom() {
        let csv = "\u{feff}name\nA\n";
        let dataset = parse_dataset(csv.as_bytes(), DataFormat::Csv).unwrap();
        assert_eq!(names(&dataset), vec!["A"]);
    }

    #[test]
    fn test_parse_json_string_and_array_shapes() {
        let json = r#"[
            {"name": "B Hub", "geography": "Durham, Orange", "primary_type": ["Digital Skills"]},
            {"name": "A Center", "geography": ["Wake"],
             "primary_type": "Device Access, Virtual Support",
             "long": "-78.6", "lat": 35.7}
        ]"#;
        let dataset = parse_dataset(json.as_bytes(), DataFormat::Json).unwrap();
        assert_eq!(names(&dataset), vec!["A Center", "B Hub"]);
        assert_eq!(
            dataset.resources[0].primary_type,
            vec!["Device Access", "Virtual Support"]
        );
        assert_eq!(
            dataset.resources[0].coordinates,
            Some(Coordinates { lon: -78.6, lat: 35.7 })
        );
        assert_eq!(dataset.resources[1].geography, vec!["Durham", "Orange"]);
    }

    #[test]
    fn test_parse_json_legacy_keys() {
        let json = r#"[{
            "Name": "Old Row",
            "Geography": "Wake",
            "Primary_Filter": "Device Access",
            "Website": "example.org"
        }]"#;
        let dataset = parse_dataset(json.as_bytes(), DataFormat::Json).unwrap();
        let r = &dataset.resources[0];
        assert_eq!(r.geography, vec!["Wake"]);
        assert_eq!(r.primary_type, vec!["Device Access"]);
        assert_eq!(r.website.as_deref(), Some("example.org"));
    }

    #[test]
    fn test_parse_json_numeric_list_values() {
        let json = r#"[
            {"name": "Zip Row", "geography": 27601},
            {"name": "Mixed Row", "geography": ["Wake", 27601, null],
             "primary_type": ["Device Access"]}
        ]"#;
        let dataset = parse_dataset(json.as_bytes(), DataFormat::Json).unwrap();
        assert_eq!(dataset.skipped, 0);
        assert_eq!(names(&dataset), vec!["Mixed Row", "Zip Row"]);
        assert_eq!(dataset.resources[0].geography, vec!["Wake", "27601"]);
        assert_eq!(dataset.resources[1].geography, vec!["27601"]);
    }

    #[test]
    fn test_parse_json_skips_bad_rows() {
        let json = r#"[
            {"name": "Good"},
            {"name": "   "},
            {"geography": "Wake"},
            {"name": 42},
            "not an object"
        ]"#;
        let dataset = parse_dataset(json.as_bytes(), DataFormat::Json).unwrap();
        assert_eq!(names(&dataset), vec!["Good"]);
        assert_eq!(dataset.skipped, 4);
    }

    #[test]
    fn test_parse_json_unparseable_payload() {
        assert!(matches!(
            parse_dataset(b"{not json", DataFormat::Json),
            Err(FinderError::Parse(_))
        ));
        assert!(matches!(
            parse_dataset(br#"{"name": "A"}"#, DataFormat::Json),
            Err(FinderError::Parse(_))
        ));
    }

    #[test]
    fn test_sort_is_case_sensitive_ordinal() {
        let json = r#"[{"name": "apple"}, {"name": "Banana"}, {"name": "Apple"}]"#;
        let dataset = parse_dataset(json.as_bytes(), DataFormat::Json).unwrap();
        assert_eq!(names(&dataset), vec!["Apple", "Banana", "apple"]);
    }
}
