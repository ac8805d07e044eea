/// Failures a controller can run into while talking to the API or the local store
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("{0}")]
    Api(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Partial data failure: {0}")]
    PartialData(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<rusqlite::Error> for ClientError {
    fn from(err: rusqlite::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in both teams")]
    MissingTeam,

    #[error("Home and away teams must differ")]
    SameTeam,
}

pub type ClientResult<T> = Result<T, ClientError>;
