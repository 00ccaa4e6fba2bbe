//! Settings module - The live, user-editable flash style
//!
//! `Settings` owns the one mutable copy of the style. Every change is
//! validated, written to the store under the field's key, and published to
//! subscribers; consumers only ever receive copies.

mod store;
mod style;

pub use store::{FileStore, MemoryStore, SettingsStore};
pub use style::{
    AnimationStyle, Color, ParseStyleError, StyleConfig, StyleKey, DEFAULT_DURATION_SECONDS,
    DEFAULT_EDGE_THICKNESS,
};

use thiserror::Error;
use tokio::sync::watch;

/// Settings errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: StyleKey, reason: String },

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// The live style settings
pub struct Settings {
    store: Box<dyn SettingsStore>,
    style_tx: watch::Sender<StyleConfig>,
}

impl Settings {
    /// Load every field from `store`
    ///
    /// Missing or invalid values fall back to their defaults.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let mut style = StyleConfig::default();

        for key in StyleKey::ALL {
            let Some(raw) = store.get(key.as_str()) else {
                continue;
            };
            if let Err(reason) = style.apply(key, &raw) {
                tracing::warn!(
                    "Stored {} is invalid ({}), using default {}",
                    key,
                    reason,
                    style.get(key)
                );
            }
        }

        let (style_tx, _) = watch::channel(style);
        Self { store, style_tx }
    }

    /// Settings backed by a volatile store
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    /// Copy of the current style
    pub fn snapshot(&self) -> StyleConfig {
        *self.style_tx.borrow()
    }

    /// Receiver that always holds the latest style
    pub fn subscribe(&self) -> watch::Receiver<StyleConfig> {
        self.style_tx.subscribe()
    }

    /// Set one field from its string form
    pub fn set(&mut self, key: StyleKey, raw: &str) -> SettingsResult<()> {
        let mut next = self.snapshot();
        next.apply(key, raw)
            .map_err(|reason| SettingsError::InvalidValue { key, reason })?;
        self.commit(next)
    }

    /// Set a field by its key name
    pub fn set_named(&mut self, key: &str, raw: &str) -> SettingsResult<()> {
        let key: StyleKey = key.parse().map_err(SettingsError::UnknownKey)?;
        self.set(key, raw)
    }

    /// Edit several fields at once
    pub fn update(&mut self, edit: impl FnOnce(&mut StyleConfig)) -> SettingsResult<()> {
        let mut next = self.snapshot();
        edit(&mut next);
        next.validate().map_err(SettingsError::InvalidStyle)?;
        self.commit(next)
    }

    /// Restore every field to its default
    pub fn reset(&mut self) -> SettingsResult<()> {
        self.commit(StyleConfig::default())
    }

    /// Persist the changed fields in one write, then publish
    ///
    /// A failed write leaves both the store and the live style unchanged.
    fn commit(&mut self, next: StyleConfig) -> SettingsResult<()> {
        let current = self.snapshot();
        let changed: Vec<(&str, String)> = StyleKey::ALL
            .into_iter()
            .map(|key| (key, next.get(key)))
            .filter(|(key, value)| *value != current.get(*key))
            .map(|(key, value)| {
                tracing::debug!("Setting {} = {}", key, value);
                (key.as_str(), value)
            })
            .collect();

        if !changed.is_empty() {
            self.store.set_many(&changed)?;
        }

        self.style_tx.send_replace(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_when_empty() {
        let settings = Settings::in_memory();
        assert_eq!(settings.snapshot(), StyleConfig::default());
    }

    #[test]
    fn test_load_falls_back_per_field() {
        let store = MemoryStore::with_values([
            ("animation_duration", "-3"),
            ("primary_color", "not-a-color"),
            ("flash_thickness", "8"),
            ("animation_style", "pulse"),
        ]);

        let style = Settings::load(Box::new(store)).snapshot();
        assert_eq!(style.duration_seconds, DEFAULT_DURATION_SECONDS);
        assert_eq!(style.primary_color, Color::CYAN);
        assert_eq!(style.edge_thickness, 8.0);
        assert_eq!(style.style, AnimationStyle::Pulse);
    }

    #[test]
    fn test_set_persists_and_publishes() {
        let mut settings = Settings::in_memory();
        let rx = settings.subscribe();

        settings.set(StyleKey::AnimationDuration, "1.2").unwrap();
        assert_eq!(rx.borrow().duration_seconds, 1.2);
        assert_eq!(
            settings.store.get("animation_duration").as_deref(),
            Some("1.2")
        );
        // Untouched fields are not written
        assert!(settings.store.get("primary_color").is_none());
    }

    #[test]
    fn test_invalid_set_changes_nothing() {
        let mut settings = Settings::in_memory();

        let err = settings.set(StyleKey::FlashThickness, "-1").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                key: StyleKey::FlashThickness,
                ..
            }
        ));
        assert!(matches!(
            settings.set_named("volume", "11"),
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(settings
            .update(|style| style.duration_seconds = 0.0)
            .is_err());
        assert_eq!(settings.snapshot(), StyleConfig::default());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut settings = Settings::in_memory();
        let taken = settings.snapshot();

        settings
            .update(|style| {
                style.duration_seconds = 1.2;
                style.show_particles = false;
            })
            .unwrap();

        assert_eq!(taken.duration_seconds, 0.6);
        assert!(taken.show_particles);
        assert_eq!(settings.snapshot().duration_seconds, 1.2);
    }

    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> SettingsResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn set_many(&mut self, _values: &[(&str, String)]) -> SettingsResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_failed_persist_is_not_published() {
        let mut settings = Settings::load(Box::new(BrokenStore));
        let rx = settings.subscribe();

        let result = settings.update(|style| {
            style.duration_seconds = 1.2;
            style.show_particles = false;
        });
        assert!(matches!(result, Err(SettingsError::Io(_))));
        assert_eq!(settings.snapshot(), StyleConfig::default());
        assert_eq!(*rx.borrow(), StyleConfig::default());
    }

    #[test]
    fn test_update_persists_all_fields_together() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        let mut settings = Settings::load(Box::new(FileStore::open(&path)));

        settings
            .update(|style| {
                style.duration_seconds = 1.2;
                style.show_particles = false;
            })
            .unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("animation_duration").as_deref(), Some("1.2"));
        assert_eq!(reopened.get("show_particles").as_deref(), Some("false"));
    }

    #[test]
    fn test_reset_writes_defaults_back() {
        let mut settings = Settings::in_memory();
        settings.set(StyleKey::ShowArrow, "false").unwrap();
        settings.reset().unwrap();

        assert!(settings.snapshot().show_direction_arrow);
        assert_eq!(settings.store.get("show_arrow").as_deref(), Some("true"));
    }
}
