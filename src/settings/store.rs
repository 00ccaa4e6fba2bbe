//! Key/value persistence for style settings

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use super::{SettingsError, SettingsResult};

/// Durable storage keyed by setting name
pub trait SettingsStore: Send {
    /// Raw stored value, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, persisting it immediately
    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()>;

    /// Store several values as one write; on error none of them are kept
    fn set_many(&mut self, values: &[(&str, String)]) -> SettingsResult<()>;
}

/// Volatile store, used when no settings file is available and in tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, values: &[(&str, String)]) -> SettingsResult<()> {
        for (key, value) in values {
            self.values.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

/// A TOML file holding one string value per setting
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and treated as empty so every setting falls back to its default;
    /// the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Ignoring style settings in {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    /// Default location in the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("screenflash/style.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> SettingsResult<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&contents)?;

        // Hand-edited files may hold bare numbers or booleans
        Ok(table
            .into_iter()
            .map(|(key, value)| {
                let raw = match value {
                    toml::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, raw)
            })
            .collect())
    }

    fn write(&self) -> SettingsResult<()> {
        let contents = toml::to_string_pretty(&self.values)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents).map_err(SettingsError::from)
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn set_many(&mut self, values: &[(&str, String)]) -> SettingsResult<()> {
        let previous = self.values.clone();
        for (key, value) in values {
            self.values.insert(key.to_string(), value.clone());
        }

        if let Err(e) = self.write() {
            self.values = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_file_store_persists_on_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/style.toml");

        let mut store = FileStore::open(&path);
        assert!(store.get("show_arrow").is_none());
        store.set("show_arrow", "false").unwrap();
        store.set("primary_color", "#ff0000").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("show_arrow").as_deref(), Some("false"));
        assert_eq!(reopened.get("primary_color").as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_file_store_reads_bare_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "animation_duration = 1.2").unwrap();
        writeln!(file, "show_particles = false").unwrap();

        let store = FileStore::open(file.path());
        assert_eq!(store.get("animation_duration").as_deref(), Some("1.2"));
        assert_eq!(store.get("show_particles").as_deref(), Some("false"));
    }

    #[test]
    fn test_failed_write_keeps_nothing() {
        // A directory cannot be written as a file
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path());

        let result = store.set_many(&[
            ("show_arrow", "false".to_string()),
            ("flash_thickness", "8".to_string()),
        ]);
        assert!(result.is_err());
        assert!(store.get("show_arrow").is_none());
        assert!(store.get("flash_thickness").is_none());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is = = not toml").unwrap();

        let store = FileStore::open(file.path());
        assert!(store.get("this").is_none());
    }
}
