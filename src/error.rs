use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("failed to read attachment {name}: {source}")]
  Read {
    name: String,
    #[source]
    source: io::Error,
  },

  /// The remote service answered with a non-success status. `body` is the
  /// parsed error payload, or `{}` when it was not JSON.
  #[error("remote service returned {status}: {body}")]
  Remote { status: u16, body: serde_json::Value },

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
