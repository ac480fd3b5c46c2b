//! Digital-equity resource finder
//!
//! Loads a crowdsourced directory of digital-equity resources (Wi-Fi access
//! points, digital-skills classes, device lending) and answers the questions
//! a resident asks of it: keyword search, county/zip and category filters,
//! paginated list results and the county map that sits next to them.
//!
//! # Example
//!
//! ```rust,ignore
//! use resource_finder::{
//!     DatasetLoader, FinderConfig, FuzzySearch, ResourceDirectory, ResourceFinder,
//! };
//!
//! let config = FinderConfig::from_env()?;
//! let directory = ResourceDirectory::new(DatasetLoader::from_config(&config)?);
//! let snapshot = directory.refresh().await?;
//!
//! let search = FuzzySearch::new().with_threshold(config.search_threshold);
//! let mut finder = ResourceFinder::from_config(&config, Default::default());
//! finder.set_search_text("laptop");
//! finder.toggle_category("Device Access");
//!
//! let page = finder.results(snapshot.resources(), &search);
//! println!("{}", finder.summary(page.total_results));
//! ```
//!
//! Search, filter and pagination are synchronous and never fail. The only
//! async operation is fetching the dataset.

pub mod categories;
pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
pub mod finder;
pub mod geography;
pub mod loader;
pub mod map;
pub mod normalize;
pub mod pagination;
pub mod search;
pub mod types;

pub use categories::{category_label, category_options};
pub use config::FinderConfig;
pub use directory::{DatasetSnapshot, ResourceDirectory};
pub use error::{FinderError, Result};
pub use filter::filter_resources;
pub use finder::{CountyKey, FinderPage, ResourceFinder, ResultSummary, ViewMode};
pub use geography::{zip_codes_in, GeographyIndex, NORTH_CAROLINA_COUNTIES};
pub use loader::{parse_dataset, DataFormat, DatasetLoader, ParsedDataset};
pub use map::{MapAdapter, MapCommand, MapEvent, MapKey};
pub use pagination::{page_window, paginate, total_pages, PageControls, PageLink, DEFAULT_PAGE_SIZE};
pub use search::{FuzzySearch, SearchHit, DEFAULT_SEARCH_THRESHOLD};
pub use types::{CategoryOption, Coordinates, GeographyKind, GeographyOption, Query, Resource};
