use serde_json::{Map, Value};

use crate::config::loader::{FileSource, SettingsSource};
use crate::config::schema::SETTINGS;
use crate::error::{Error, Result};

/// Process-wide settings mapping that loads itself on first access.
///
/// Reads (`get`, `get_optional`, `pop`, `snapshot`) check the `loaded` flag,
/// not key presence, so a value written with `insert` before any load still
/// triggers the loader on the next read.
pub struct SettingsRegistry {
    values: Map<String, Value>,
    loaded: bool,
    source: Box<dyn SettingsSource>,
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::with_source(Box::new(FileSource::new()))
    }

    pub fn with_source(source: Box<dyn SettingsSource>) -> Self {
        Self {
            values: Map::new(),
            loaded: false,
            source,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&mut self, key: &str) -> Result<Value> {
        self.ensure_loaded()?;
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_owned()))
    }

    pub fn get_optional(&mut self, key: &str) -> Result<Option<Value>> {
        self.ensure_loaded()?;
        Ok(self.values.get(key).cloned())
    }

    /// Remove and return a value. A second `pop` of the same key fails with
    /// `Error::NotFound`, like any other absent key.
    pub fn pop(&mut self, key: &str) -> Result<Value> {
        self.ensure_loaded()?;
        self.values
            .remove(key)
            .ok_or_else(|| Error::NotFound(key.to_owned()))
    }

    /// Detached copy of the current values, not a live view.
    pub fn snapshot(&mut self) -> Result<Map<String, Value>> {
        self.ensure_loaded()?;
        Ok(self.values.clone())
    }

    /// Plain write. Does not mark the registry loaded.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Overlay the raw settings onto the static defaults and validate every
    /// table key. With `None`, raw settings come from the injected source.
    /// On any failure the registry keeps its post-overlay contents and stays
    /// unloaded.
    pub fn load(&mut self, raw_settings: Option<Map<String, Value>>) -> Result<()> {
        let raw = match raw_settings {
            Some(raw) => raw,
            None => self.source.read()?,
        };

        self.values.clear();
        self.load_defaults();
        for (key, value) in raw {
            self.values.insert(key, value);
        }
        self.validate()?;
        self.loaded = true;
        tracing::debug!(settings = self.values.len(), "configuration loaded");
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.load(None)
    }

    fn load_defaults(&mut self) {
        for setting in SETTINGS {
            self.values
                .insert(setting.key.to_owned(), setting.default.to_value());
        }
    }

    /// Run every table validator over the current contents, replacing values
    /// with their coerced forms. Failures are collected, not short-circuited,
    /// and reported together in table order. Keys absent from the table are
    /// left untouched.
    fn validate(&mut self) -> Result<()> {
        let mut failures = Vec::new();
        for setting in SETTINGS {
            let Some(current) = self.values.get(setting.key) else {
                continue;
            };
            let outcome = setting.validator.apply(current);
            match outcome {
                Ok(validated) => {
                    self.values.insert(setting.key.to_owned(), validated);
                }
                Err(reason) => failures.push(format!("{}: {reason}", setting.key)),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidValues(failures.join("\n\t")))
        }
    }
}
