use crate::model::Expired;
use std::num::ParseIntError;
use thiserror::Error;

/// Everything that can fail a single `/quote` request.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("request deadline exceeded before work began")]
    DeadlineExceeded,

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("response encoding failed: {0}")]
    Encoding(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream body is not a valid quote: {0}")]
    Body(#[from] serde_json::Error),

    #[error("upstream did not answer in time")]
    TimedOut(#[from] Expired),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no database connection available: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("timestamp is not a base-10 integer: {0}")]
    Timestamp(#[from] ParseIntError),

    #[error("quote field {0} is empty")]
    MissingField(&'static str),

    #[error("insert task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("insert did not finish in time")]
    TimedOut(#[from] Expired),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to quote server failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("quote server did not answer in time")]
    TimedOut(#[from] Expired),

    #[error("response is not a flat JSON object of strings: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
