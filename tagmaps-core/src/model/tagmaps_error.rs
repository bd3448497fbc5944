use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagMapsError {
    #[error("no candidate items left to cluster after item selection")]
    NothingToCluster,
    #[error("clustering requires at least 2 points, found {0}")]
    InsufficientPoints(usize),
    #[error("post '{0}' referenced by a cluster is missing from the cleaned post collection")]
    MissingPost(String),
    #[error("cut distance must be a positive, finite number of meters, found {0}")]
    InvalidCutDistance(f64),
    #[error("unsupported coordinate reference system EPSG:{0}, expected a WGS84 UTM zone (326xx or 327xx)")]
    InvalidCrs(u32),
    #[error("cannot derive analysis bounds, no post has a valid coordinate")]
    EmptyBounds,
    #[error("cluster worker failed: {0}")]
    WorkerError(String),
    #[error("invalid tagmaps configuration: {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    InternalError(String),
}
