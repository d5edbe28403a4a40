#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Named dataset storage for bankers
//!
//! All datasets live in one JSON file. The store keeps the parsed file in
//! memory and rewrites it atomically (temporary file, then rename) after
//! every change, so a crash never leaves a half-written file behind.
//! Only datasets that pass validation are ever written.

mod models;

pub use models::DatasetFile;

use bankers_errors::{Error, StorageError};
use bankers_state::ResourceState;
use bankers_types::Dataset;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Supported dataset file format version
pub const SUPPORTED_VERSION: u32 = 1;

/// Dataset file manager
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
    file: DatasetFile,
}

impl DatasetStore {
    /// Open the dataset file at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let file = match fs::read_to_string(&path).await {
            Ok(content) => DatasetFile::from_json(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "dataset file absent, starting empty");
                DatasetFile::new()
            }
            Err(e) => return Err(StorageError::from_io_with_path(&e, &path).into()),
        };

        debug!(
            path = %path.display(),
            datasets = file.datasets.len(),
            "opened dataset store"
        );
        Ok(Self { path, file })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dataset names in sorted order
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.file.datasets.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.file.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file.datasets.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.file.datasets.contains_key(name)
    }

    /// Look up a dataset by name
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DatasetNotFound` if no dataset has that name.
    pub fn get(&self, name: &str) -> Result<&Dataset, Error> {
        self.file.datasets.get(name).ok_or_else(|| {
            StorageError::DatasetNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Look up a dataset and build its validated snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is missing or fails validation.
    pub fn load_state(&self, name: &str) -> Result<ResourceState, Error> {
        let dataset = self.get(name)?;
        Ok(ResourceState::try_from(dataset)?)
    }

    /// Insert or replace a dataset and persist the file.
    ///
    /// Returns `true` when an existing dataset was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the dataset fails validation,
    /// or the file cannot be written.
    pub async fn save(&mut self, name: &str, dataset: Dataset) -> Result<bool, Error> {
        let name = validate_name(name)?;
        ResourceState::try_from(&dataset)?;

        let replaced = self.file.datasets.insert(name.to_string(), dataset).is_some();
        self.persist().await?;

        info!(name, replaced, path = %self.path.display(), "saved dataset");
        Ok(replaced)
    }

    /// Read a single dataset from a JSON file and save it under `name`
    ///
    /// Returns the dataset and whether it replaced an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed, or if saving
    /// fails for any reason `save` would.
    pub async fn import(
        &mut self,
        name: &str,
        source: impl AsRef<Path>,
    ) -> Result<(Dataset, bool), Error> {
        let source = source.as_ref();
        let content = fs::read_to_string(source)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, source))?;
        let dataset: Dataset =
            serde_json::from_str(&content).map_err(|e| StorageError::CorruptedData {
                message: format!("{}: {e}", source.display()),
            })?;

        let replaced = self.save(name, dataset.clone()).await?;
        Ok((dataset, replaced))
    }

    /// Remove a dataset and persist the file
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DatasetNotFound` if no dataset has that name,
    /// or an error if the file cannot be written.
    pub async fn remove(&mut self, name: &str) -> Result<Dataset, Error> {
        let removed = self
            .file
            .datasets
            .remove(name)
            .ok_or_else(|| StorageError::DatasetNotFound {
                name: name.to_string(),
            })?;
        self.persist().await?;

        info!(name, path = %self.path.display(), "removed dataset");
        Ok(removed)
    }

    async fn persist(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, parent))?;
        }

        let json = self.file.to_json()?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &json)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &temp_path))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::AtomicRenameFailed {
                message: format!("{} -> {}: {e}", temp_path.display(), self.path.display()),
            })?;

        debug!(path = %self.path.display(), bytes = json.len(), "wrote dataset file");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str, StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(trimmed)
}
