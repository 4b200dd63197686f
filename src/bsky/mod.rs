//! Bluesky API client.
//!
//! One client, one configurable authentication strategy: either the public
//! AppView is queried without credentials, or a session is created on the
//! entryway and the search carries a bearer token. Nothing is retried and no
//! token is cached; each search stands alone.

mod client;
mod models;

pub use client::BskyClient;
pub use models::{Author, PostRecord, RawPost};

/// Errors that can occur while talking to Bluesky.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Login was rejected or returned no usable token.
    #[error("Bluesky login failed: {0}")]
    Auth(String),

    /// The HTTP request could not be completed.
    #[error("request to Bluesky failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Bluesky answered with a non-success status; the upstream message is
    /// passed through when one was parseable.
    #[error("{0}")]
    Upstream(String),

    /// The response body was not the JSON shape we expected.
    #[error("invalid response from Bluesky: {0}")]
    Parse(String),
}
