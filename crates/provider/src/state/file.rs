//! JSON file state store
//!
//! The whole state lives in one JSON document:
//!
//! ```json
//! { "version": 1, "resources": { "<address>": { "type_name": "...", "id": "...", "yaml": "...", "attributes": {} } } }
//! ```
//!
//! Every write replaces the file through a temporary sibling and a rename, so
//! an interrupted write never leaves a truncated state file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ResourceState, StateError, StateStore};

/// State file format version
pub const STATE_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(default)]
    resources: BTreeMap<String, ResourceState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_FILE_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

/// State store persisted to a JSON file
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store at `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateFile, StateError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("State file {} does not exist yet", self.path.display());
                return Ok(StateFile::default());
            }
            Err(e) => return Err(e.into()),
        };

        let file: StateFile = serde_json::from_str(&contents)?;
        if file.version != STATE_FILE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: file.version,
                expected: STATE_FILE_VERSION,
            });
        }
        Ok(file)
    }

    /// Sibling the next write goes to, unique per process
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", std::process::id()));
        PathBuf::from(tmp)
    }

    fn save(&self, file: &StateFile) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        let contents = serde_json::to_string_pretty(file)?;
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "Wrote {} resource(s) to {}",
            file.resources.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, address: &str) -> Result<Option<ResourceState>, StateError> {
        Ok(self.load()?.resources.remove(address))
    }

    fn put(&self, address: &str, state: ResourceState) -> Result<(), StateError> {
        let mut file = self.load()?;
        file.resources.insert(address.to_string(), state);
        self.save(&file)
    }

    fn remove(&self, address: &str) -> Result<Option<ResourceState>, StateError> {
        let mut file = self.load()?;
        let removed = file.resources.remove(address);
        if removed.is_some() {
            self.save(&file)?;
        }
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<(String, ResourceState)>, StateError> {
        Ok(self.load()?.resources.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(id: &str) -> ResourceState {
        ResourceState {
            type_name: "k8s_test_manifest".to_string(),
            id: id.to_string(),
            yaml: "kind: Test\n".to_string(),
            attributes: json!({ "metadata": { "name": "a" } }),
        }
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        assert!(store.list().unwrap().is_empty());
        assert!(store.get("anything").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_put_get_remove_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = FileStateStore::new(&path);

        store.put("k8s_test_manifest.a", state("1")).unwrap();
        assert!(path.exists());

        let reopened = FileStateStore::new(&path);
        assert_eq!(reopened.get("k8s_test_manifest.a").unwrap(), Some(state("1")));

        assert_eq!(reopened.remove("k8s_test_manifest.a").unwrap(), Some(state("1")));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_temp_file_is_per_process_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        let tmp = store.temp_path();
        assert_eq!(
            tmp.file_name().unwrap().to_string_lossy(),
            format!("state.json.{}.tmp", std::process::id())
        );

        store.put("k8s_test_manifest.a", state("1")).unwrap();
        store.put("k8s_test_manifest.b", state("2")).unwrap();
        assert!(!tmp.exists());

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{ "version": 99, "resources": {} }"#).unwrap();

        let err = FileStateStore::new(&path).list().unwrap_err();
        assert!(matches!(err, StateError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStateStore::new(&path).get("a").unwrap_err();
        assert!(matches!(err, StateError::Corrupt(_)));
    }
}
