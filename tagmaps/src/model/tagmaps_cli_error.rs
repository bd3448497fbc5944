use tagmaps_core::TagMapsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagMapsCliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading cleaned posts: {0}")]
    InputError(String),
    #[error("tag maps run failed: {source}")]
    TagMapsError {
        #[from]
        source: TagMapsError,
    },
    #[error("failure accessing file: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure reading or writing CSV: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },
    #[error("failure encoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
}
