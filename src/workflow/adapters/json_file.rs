//! JSON file project store.
//!
//! The whole collection lives in one pretty-printed JSON document. Access
//! goes through a capability handle on the parent directory; writes land in
//! a sibling temporary file that is then renamed over the target.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use tracing::debug;

use crate::workflow::{
    domain::ProjectCollection,
    ports::{ProjectStore, StoreError, StoreResult, check_next_version},
};

/// Project store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileProjectStore {
    path: Utf8PathBuf,
}

impl JsonFileProjectStore {
    /// Creates a store for the file at `path`.
    ///
    /// The file and its parent directory are created on first save.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn file_name(&self) -> StoreResult<&str> {
        self.path.file_name().ok_or_else(|| {
            StoreError::io(std::io::Error::other(format!(
                "store path '{}' must include a file name",
                self.path
            )))
        })
    }

    fn parent(&self) -> &Utf8Path {
        self.path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."))
    }

    /// Opens the parent directory, or returns `None` when it does not exist.
    fn open_parent(&self) -> StoreResult<Option<Dir>> {
        match Dir::open_ambient_dir(self.parent(), ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(err)),
        }
    }

    fn open_or_create_parent(&self) -> StoreResult<Dir> {
        let parent = self.parent();
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(StoreError::io)?;
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(StoreError::io)
    }

    fn read_stored(&self) -> StoreResult<ProjectCollection> {
        let file_name = self.file_name()?;
        let Some(dir) = self.open_parent()? else {
            return Ok(ProjectCollection::new());
        };
        let contents = match dir.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(ProjectCollection::new());
            }
            Err(err) => return Err(StoreError::io(err)),
        };
        if contents.trim().is_empty() {
            return Ok(ProjectCollection::new());
        }
        let collection: ProjectCollection = serde_json::from_str(&contents)
            .map_err(|err| StoreError::malformed(err.to_string()))?;
        collection.check_invariants()?;
        Ok(collection)
    }
}

impl ProjectStore for JsonFileProjectStore {
    fn load(&self) -> StoreResult<ProjectCollection> {
        let collection = self.read_stored()?;
        debug!(
            path = %self.path,
            version = collection.version(),
            projects = collection.len(),
            "loaded project collection"
        );
        Ok(collection)
    }

    fn save(&self, collection: &ProjectCollection) -> StoreResult<()> {
        let stored = self.read_stored()?;
        if stored == *collection {
            debug!(path = %self.path, "collection unchanged, nothing written");
            return Ok(());
        }
        check_next_version(stored.version(), collection.version())?;
        collection.check_invariants()?;

        let file_name = self.file_name()?;
        let temp_name = format!("{file_name}.tmp");
        let data = serde_json::to_string_pretty(collection)
            .map_err(|err| StoreError::malformed(err.to_string()))?;
        let dir = self.open_or_create_parent()?;
        dir.write(&temp_name, data.as_bytes())
            .map_err(StoreError::io)?;
        dir.rename(&temp_name, &dir, file_name).map_err(StoreError::io)?;
        debug!(
            path = %self.path,
            version = collection.version(),
            projects = collection.len(),
            "saved project collection"
        );
        Ok(())
    }
}
