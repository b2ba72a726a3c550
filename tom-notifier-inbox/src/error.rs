#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    ///
    /// Credentials were rejected. Never retried automatically,
    /// host application should force reauthentication.
    ///
    #[error("unauthorized: reauthentication required")]
    Unauthorized,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl Error {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Error::Decode(err.to_string());
        }

        Error::Network(err.to_string())
    }
}

impl From<&event_stream_client::Error> for Error {
    fn from(err: &event_stream_client::Error) -> Self {
        match err {
            event_stream_client::Error::Unauthorized => Error::Unauthorized,
            event_stream_client::Error::UnexpectedStatus(status) => {
                Error::UnexpectedStatus(status.as_u16())
            }
            err => Error::Network(err.to_string()),
        }
    }
}
