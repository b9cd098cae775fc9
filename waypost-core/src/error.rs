use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("Invalid config values were set: \n\t{0}")]
    InvalidValues(String),

    #[error("not found: {0}")]
    NotFound(String),
}
