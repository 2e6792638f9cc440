use std::path::PathBuf;

use thiserror::Error;

/// Which stage of the pipeline an error came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Io,
    Query,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Fetch { .. } | Error::HttpClient(_) => ErrorKind::Fetch,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Io { .. } => ErrorKind::Io,
            Error::Query(_) | Error::Sql(_) => ErrorKind::Query,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(format!("invalid JSON: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
