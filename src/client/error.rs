use std::fmt;

/// Boxed failure reported by a [`Transport`](super::Transport)
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("variable `{0}` is bound more than once")]
    DuplicateVariable(String),
    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("request failed: {0}")]
    Transport(#[source] TransportError),
    #[error("failed to decode response payload: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("response carries neither data nor errors")]
    MissingData,
    #[error(transparent)]
    Server(#[from] ServerErrors),
}

/// Position in the operation document, starting from line and column 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// One entry of the `errors` list of a GraphQL response
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ServerError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server failure: {}", self.message)
    }
}

impl std::error::Error for ServerError {}

/// Errors returned by the server. Displays as the first of them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{first}")]
pub struct ServerErrors {
    pub first: ServerError,
    pub rest: Vec<ServerError>,
}

impl ServerErrors {
    pub(super) fn from_vec(errors: Vec<ServerError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let first = errors.next()?;
        Some(ServerErrors {
            first,
            rest: errors.collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerError> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }
}
