//! Session file storage
//!
//! Loads, saves, imports and exports the session forest as JSON.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};
use crate::session::{Forest, NodeId};

use super::facade::{self, Facade};

/// How session files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Owns the live forest and the default session file it came from
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    forest: Forest,
    options: StoreOptions,
}

impl SessionStore {
    /// Load the forest from `path` (an empty forest if the file is missing)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Like [`open`](Self::open) with explicit write options
    pub fn open_with(path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let path = path.into();
        let forest = load(&path)?;
        Ok(Self {
            path,
            forest,
            options,
        })
    }

    /// Default session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn forest_mut(&mut self) -> &mut Forest {
        &mut self.forest
    }

    /// Re-read the session file
    ///
    /// The held forest is only replaced once the new one loaded cleanly.
    pub fn reload(&mut self) -> Result<()> {
        self.forest = load(&self.path)?;
        Ok(())
    }

    /// Write the forest to the default session file
    pub fn save(&self) -> Result<()> {
        save(&self.forest, &self.path, self.options)
    }

    /// Append the sessions from another file to the roots
    ///
    /// The file is parsed completely before the forest is touched. Unlike
    /// [`load`], a missing file is an error here.
    #[instrument(skip(self))]
    pub fn import_from(&mut self, path: &Path) -> Result<Vec<NodeId>> {
        let facades = read_facades(path)?.ok_or_else(|| StoreError::Read {
            path: path.to_path_buf(),
            source: ErrorKind::NotFound.into(),
        })?;

        let imported = facade::decode_into(&mut self.forest, facades, None)?;
        info!("Imported {} top-level nodes from {:?}", imported.len(), path);
        Ok(imported)
    }

    /// Snapshot the forest to an arbitrary file
    pub fn export_to(&self, path: &Path) -> Result<()> {
        save(&self.forest, path, self.options)
    }
}

/// Load a forest from a session file
///
/// A missing file is the normal first-run state and yields an empty forest.
#[instrument]
pub fn load(path: &Path) -> Result<Forest> {
    let mut forest = Forest::new();
    match read_facades(path)? {
        Some(facades) => {
            facade::decode_into(&mut forest, facades, None)?;
            debug!("Loaded {} nodes", forest.len());
        }
        None => debug!("No session file yet"),
    }
    Ok(forest)
}

/// Write a forest to a session file
///
/// If the parent directory does not exist it is created and the write is
/// retried once.
#[instrument(skip(forest))]
pub fn save(forest: &Forest, path: &Path, options: StoreOptions) -> Result<()> {
    let bytes = facade::to_json(&facade::encode(forest), options.pretty)
        .map_err(StoreError::Encode)?;
    write_with_retry(path, &bytes)?;
    debug!("Saved {} nodes", forest.len());
    Ok(())
}

fn read_facades(path: &Path) -> std::result::Result<Option<Vec<Facade>>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    facade::from_json(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_with_retry(path: &Path, bytes: &[u8]) -> std::result::Result<(), StoreError> {
    let write_failed = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    match fs::write(path, bytes) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
                return Err(write_failed(e));
            };
            fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
            debug!("Created {:?}, retrying write", dir);
            fs::write(path, bytes).map_err(write_failed)
        }
        Err(e) => Err(write_failed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::{Node, Session};
    use tempfile::TempDir;

    fn prod_forest() -> Forest {
        let mut forest = Forest::new();
        let prod = forest.insert_root(Node::directory("Prod"));
        forest
            .insert_child(prod, Session::new("10.0.0.1", 6379))
            .unwrap();
        forest
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let forest = load(&temp_dir.path().join("nope.json")).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Parse { .. })));
    }

    #[test]
    fn test_reload_failure_keeps_forest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.json");
        save(&prod_forest(), &path, StoreOptions::default()).unwrap();

        let mut store = SessionStore::open(&path).unwrap();
        assert_eq!(store.forest().len(), 2);

        fs::write(&path, "[{\"Port\": \"oops\"}]").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.forest().len(), 2);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("sessions.json");

        save(&prod_forest(), &path, StoreOptions::default()).unwrap();

        let forest = load(&path).unwrap();
        assert_eq!(forest.root_at(0).label(), "Prod");
    }

    #[test]
    fn test_save_reports_unwritable_target() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("sessions.json");

        let err = save(&prod_forest(), &path, StoreOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_compact_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.json");
        save(&prod_forest(), &path, StoreOptions { pretty: false }).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.starts_with("[{\"Name\":\"Prod\""));
    }

    #[test]
    fn test_import_appends() {
        let temp_dir = TempDir::new().unwrap();
        let external = temp_dir.path().join("external.json");
        save(&prod_forest(), &external, StoreOptions::default()).unwrap();

        let mut store = SessionStore::open(temp_dir.path().join("sessions.json")).unwrap();
        let local = store.forest_mut().insert_root(Session::new("127.0.0.1", 6379));

        let imported = store.import_from(&external).unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(store.forest().roots()[0], local);
        assert_eq!(store.forest().roots()[1], imported[0]);
        assert_eq!(store.forest().len(), 3);
    }

    #[test]
    fn test_import_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(temp_dir.path().join("sessions.json")).unwrap();

        let err = store
            .import_from(&temp_dir.path().join("missing.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Read { .. })));
        assert!(store.forest().is_empty());
    }

    #[test]
    fn test_import_malformed_leaves_forest() {
        let temp_dir = TempDir::new().unwrap();
        let external = temp_dir.path().join("external.json");
        fs::write(&external, "[{\"Name\":\"Ok\"}, 42]").unwrap();

        let mut store = SessionStore::open(temp_dir.path().join("sessions.json")).unwrap();
        assert!(store.import_from(&external).is_err());
        assert!(store.forest().is_empty());
    }

    #[test]
    fn test_export_is_independent_of_default_path() {
        let temp_dir = TempDir::new().unwrap();
        let default = temp_dir.path().join("sessions.json");
        let snapshot = temp_dir.path().join("exports").join("snapshot.json");

        let mut store = SessionStore::open(&default).unwrap();
        store.forest_mut().insert_root(Session::new("127.0.0.1", 6379));
        store.export_to(&snapshot).unwrap();

        assert!(!default.exists());
        assert_eq!(load(&snapshot).unwrap().len(), 1);
    }
}
