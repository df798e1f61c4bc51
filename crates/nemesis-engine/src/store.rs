//! Inventory and drop-queue persistence.
//!
//! The store is a directory holding two JSON files:
//! - `inventory.json`: flat object of item name to held count
//! - `queue.json`: array of queued drop names
//!
//! Writes go through a temp file and a rename so an interrupted save never
//! leaves a truncated file behind.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use nemesis_advisor::advisor::Advisor;
use nemesis_advisor::catalog::Catalog;
use nemesis_advisor::inventory::Inventory;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Inventory file name.
pub const INVENTORY_FILE: &str = "inventory.json";

/// Queue file name.
pub const QUEUE_FILE: &str = "queue.json";

/// Errors that can occur while reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("Malformed {file}: {source}")]
    Json {
        /// File that failed.
        file: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// On-disk inventory layout.
pub type InventoryFile = BTreeMap<String, u32>;

/// Directory-backed inventory and queue store.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    dir: PathBuf,
}

impl InventoryStore {
    /// Creates a store rooted at a directory. Nothing is touched until the
    /// first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the inventory file.
    #[must_use]
    pub fn inventory_path(&self) -> PathBuf {
        self.dir.join(INVENTORY_FILE)
    }

    /// Path of the queue file.
    #[must_use]
    pub fn queue_path(&self) -> PathBuf {
        self.dir.join(QUEUE_FILE)
    }

    /// Loads the saved inventory. Unknown and virtual names are skipped.
    pub fn load_inventory(&self, catalog: &Catalog) -> StoreResult<Inventory> {
        let Some(saved) = read_json::<InventoryFile>(&self.inventory_path())? else {
            debug!("No saved inventory in {}", self.dir.display());
            return Ok(Inventory::new());
        };

        let (inventory, rejected) =
            Inventory::from_named(catalog, saved.iter().map(|(name, n)| (name.as_str(), *n)));
        for name in rejected {
            warn!("Skipping unknown item in saved inventory: {name}");
        }
        Ok(inventory)
    }

    /// Saves the inventory, keeping only positive counts.
    pub fn save_inventory(&self, catalog: &Catalog, inventory: &Inventory) -> StoreResult<()> {
        let file: InventoryFile = inventory
            .named(catalog)
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        write_json(&self.inventory_path(), &file)
    }

    /// Loads the saved drop queue as names.
    pub fn load_queue(&self) -> StoreResult<Vec<String>> {
        Ok(read_json(&self.queue_path())?.unwrap_or_default())
    }

    /// Saves the drop queue.
    pub fn save_queue(&self, queue: &[&str]) -> StoreResult<()> {
        write_json(&self.queue_path(), &queue)
    }

    /// Builds an advisor from the saved inventory and queue.
    ///
    /// Queue entries that no longer name a drop are skipped.
    pub fn load_advisor(&self, catalog: Catalog) -> StoreResult<Advisor> {
        let inventory = self.load_inventory(&catalog)?;
        let queue = self.load_queue()?;

        let mut advisor = Advisor::new(catalog, inventory);
        for name in queue {
            if let Err(e) = advisor.queue_drop(&name) {
                warn!("Skipping queued drop: {e}");
            }
        }

        info!(
            "Loaded {} held items and {} queued drops from {}",
            advisor.inventory().iter().count(),
            advisor.queued().len(),
            self.dir.display()
        );
        Ok(advisor)
    }

    /// Saves the advisor's inventory and queue.
    pub fn save_advisor(&self, advisor: &Advisor) -> StoreResult<()> {
        self.save_inventory(advisor.catalog(), advisor.inventory())?;
        self.save_queue(&advisor.queued())?;
        debug!("Saved inventory to {}", self.dir.display());
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let reader = BufReader::new(File::open(path)?);
    let value = serde_json::from_reader(reader).map_err(|source| StoreError::Json {
        file: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Json {
            file: path.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StoreError::Io(e)
    })
}
