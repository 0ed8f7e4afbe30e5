use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} env var not set")]
    MissingConfig(&'static str),

    #[error("Error querying Timestream: {0}")]
    Query(#[source] BoxError),

    #[error("Malformed Timestream row: {0}")]
    MalformedRow(String),

    #[error("Error posting to Discord: {0}")]
    Delivery(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, Error>;
