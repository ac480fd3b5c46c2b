//! The loaded dataset and its refresh cycle.
//!
//! A [`ResourceDirectory`] publishes the current dataset as an immutable
//! [`DatasetSnapshot`] behind an `Arc`. Readers clone the `Arc` and never
//! wait on the network. Refreshes are serialized: while one is running,
//! other callers queue, and a caller whose wait ended with a successful
//! refresh reuses that snapshot instead of fetching again.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::loader::{DatasetLoader, ParsedDataset};
use crate::types::Resource;

/// An immutable loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetSnapshot {
    resources: Vec<Resource>,
    skipped: usize,
    loaded_at: Option<DateTime<Utc>>,
}

impl DatasetSnapshot {
    /// Snapshot of already-loaded resources, stamped now.
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            skipped: 0,
            loaded_at: Some(Utc::now()),
        }
    }

    fn from_parsed(dataset: ParsedDataset) -> Self {
        Self {
            resources: dataset.resources,
            skipped: dataset.skipped,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Rows dropped while parsing this snapshot.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// When the snapshot was loaded; `None` before the first load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Holds the current snapshot and refreshes it through a [`DatasetLoader`].
#[derive(Debug)]
pub struct ResourceDirectory {
    loader: DatasetLoader,
    current: RwLock<Arc<DatasetSnapshot>>,
    refresh_lock: Mutex<()>,
    /// Bumped after every successful refresh.
    generation: AtomicU64,
}

impl ResourceDirectory {
    /// Empty directory; call [`refresh`](Self::refresh) to load.
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            current: RwLock::new(Arc::new(DatasetSnapshot::default())),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Directory seeded with an existing snapshot.
    pub fn with_snapshot(self, snapshot: DatasetSnapshot) -> Self {
        self.publish(Arc::new(snapshot));
        self
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<DatasetSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Fetch the dataset and publish it.
    ///
    /// On failure the previous snapshot stays current and the error is
    /// returned.
    #[instrument(skip(self), fields(url = %self.loader.url()))]
    pub async fn refresh(&self) -> Result<Arc<DatasetSnapshot>> {
        let observed = self.generation.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;

        if self.generation.load(Ordering::Acquire) != observed {
            info!("Refresh completed while waiting, reusing snapshot");
            return Ok(self.snapshot());
        }

        match self.loader.fetch().await {
            Ok(dataset) => {
                let snapshot = Arc::new(DatasetSnapshot::from_parsed(dataset));
                self.publish(Arc::clone(&snapshot));
                self.generation.fetch_add(1, Ordering::AcqRel);
                info!(
                    resources = snapshot.len(),
                    skipped = snapshot.skipped(),
                    "Directory refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!(
                    error = %e,
                    kept_resources = self.snapshot().len(),
                    "Directory refresh failed, keeping previous snapshot"
                );
                Err(e)
            }
        }
    }

    fn publish(&self, snapshot: Arc<DatasetSnapshot>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = snapshot;
    }
}
