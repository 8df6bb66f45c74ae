use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{0} is not defined")]
    MissingConfig(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
