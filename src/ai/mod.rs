//! Optional remote scoring path
//!
//! Sends the changed source and the persona label to an OpenAI-compatible
//! chat endpoint and expects a `{score, verdict}` JSON object back,
//! possibly wrapped in markdown fences or prose. BYOK: the key comes from
//! config or the environment.
//!
//! The remote path is optimistic and never fatal. Every variant of
//! [`RemoteError`] means the same thing to the pipeline: fall back to the
//! structural scorer.

mod client;
mod verdict;

pub use client::{RemoteConfig, RemoteScorer};
pub use verdict::{parse_structured_verdict, RemoteVerdict};

use thiserror::Error;

/// Errors on the remote scoring path
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse remote response: {0}")]
    Malformed(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;
