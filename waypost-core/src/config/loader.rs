use std::env;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Environment variable naming the settings file to load.
pub const CONFIG_PATH_ENV: &str = "WAYPOST_CONFIG";

const SEARCH_PATHS: &[&str] = &["waypost.toml", "/etc/waypost/waypost.toml"];

/// Provider of raw settings for the registry. The production implementation
/// reads the settings file; tests substitute in-memory sources.
pub trait SettingsSource {
    fn read(&self) -> Result<Map<String, Value>>;
}

/// Reads raw settings from a TOML file, resolved from an explicit path,
/// `WAYPOST_CONFIG`, or the conventional locations.
pub struct FileSource {
    path: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self { path: None }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for FileSource {
    fn read(&self) -> Result<Map<String, Value>> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => find_settings_file(env::var(CONFIG_PATH_ENV).ok().as_deref())?,
        };
        tracing::debug!(path = %path.display(), "reading settings file");
        read_settings_file(&path)
    }
}

/// Resolve the settings file path. An explicit env override must exist;
/// otherwise the first existing conventional location wins.
pub fn find_settings_file(env_override: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = env_override {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        return Err(Error::Config(format!(
            "settings file '{}' from {CONFIG_PATH_ENV} does not exist",
            path.display()
        )));
    }

    for candidate in SEARCH_PATHS {
        let path = Path::new(candidate);
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    Err(Error::Config(format!(
        "unable to locate a settings file; set {CONFIG_PATH_ENV} or create waypost.toml"
    )))
}

/// Parse a TOML settings file into a flat map. Nested tables flatten into
/// dotted keys, so `[session] secret = "x"` and `"session.secret" = "x"`
/// are equivalent.
pub fn read_settings_file(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Config(format!("failed to read settings '{}': {err}", path.display()))
    })?;

    let table: toml::Table = toml::from_str(&content).map_err(|err| {
        Error::Config(format!(
            "failed to parse settings '{}': {err}",
            path.display()
        ))
    })?;

    let mut flat = Map::new();
    flatten_table(&mut flat, "", &table);
    Ok(flat)
}

fn flatten_table(flat: &mut Map<String, Value>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_table(flat, &full_key, nested),
            other => {
                flat.insert(full_key, toml_to_json(other));
            }
        }
    }
}

fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text.clone()),
        toml::Value::Integer(number) => Value::from(*number),
        toml::Value::Float(number) => serde_json::Number::from_f64(*number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(flag) => Value::Bool(*flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(nested) => {
            let mut flat = Map::new();
            flatten_table(&mut flat, "", nested);
            Value::Object(flat)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::{find_settings_file, read_settings_file, FileSource, SettingsSource};

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_flat_keys() {
        let file = write_toml("wiki_url = \"test\"\nfedmsg_enabled = \"on\"\n");
        let settings = read_settings_file(file.path()).unwrap();
        assert_eq!(settings.get("wiki_url"), Some(&json!("test")));
        assert_eq!(settings.get("fedmsg_enabled"), Some(&json!("on")));
    }

    #[test]
    fn flattens_nested_tables() {
        let file = write_toml("[session]\nsecret = \"shhh\"\n\n[authtkt]\nsecret = \"safe\"\n");
        let settings = read_settings_file(file.path()).unwrap();
        assert_eq!(settings.get("session.secret"), Some(&json!("shhh")));
        assert_eq!(settings.get("authtkt.secret"), Some(&json!("safe")));
    }

    #[test]
    fn quoted_dotted_keys_match_nested_tables() {
        let file = write_toml("\"session.secret\" = \"shhh\"\n");
        let settings = read_settings_file(file.path()).unwrap();
        assert_eq!(settings.get("session.secret"), Some(&json!("shhh")));
    }

    #[test]
    fn preserves_toml_value_types() {
        let file = write_toml(
            "top_testers_timeframe = 14\nfedmsg_enabled = true\nadmin_groups = [\"a\", \"b\"]\n",
        );
        let settings = read_settings_file(file.path()).unwrap();
        assert_eq!(settings.get("top_testers_timeframe"), Some(&json!(14)));
        assert_eq!(settings.get("fedmsg_enabled"), Some(&json!(true)));
        assert_eq!(settings.get("admin_groups"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let error = read_settings_file(Path::new("/nonexistent/waypost.toml"))
            .expect_err("read should fail");
        assert!(error.to_string().contains("failed to read settings"));
    }

    #[test]
    fn parse_failure_is_a_config_error() {
        let file = write_toml("not toml = = =\n");
        let error = read_settings_file(file.path()).expect_err("parse should fail");
        assert!(error.to_string().contains("failed to parse settings"));
    }

    #[test]
    fn env_override_wins_when_it_exists() {
        let file = write_toml("wiki_url = \"test\"\n");
        let resolved = find_settings_file(file.path().to_str()).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn env_override_must_exist() {
        let error =
            find_settings_file(Some("/nonexistent/waypost.toml")).expect_err("resolve should fail");
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn file_source_reads_explicit_path() {
        let file = write_toml("wiki_url = \"test\"\n");
        let source = FileSource::with_path(file.path().to_path_buf());
        let settings = source.read().unwrap();
        assert_eq!(settings.get("wiki_url"), Some(&json!("test")));
    }
}
