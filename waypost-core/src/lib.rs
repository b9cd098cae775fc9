pub mod config;
pub mod error;
pub mod logging;

pub use config::SettingsRegistry;
pub use error::{Error, Result};
