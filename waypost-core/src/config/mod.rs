pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use loader::{find_settings_file, read_settings_file, FileSource, SettingsSource};
pub use registry::SettingsRegistry;
pub use schema::{DefaultValue, Setting, SETTINGS};
pub use validation::{Validator, PLACEHOLDER_SECRET};
