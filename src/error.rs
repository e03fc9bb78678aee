use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConsoleError {
    /// Non-2xx response. `detail` is the response body, or `HTTP {status}`
    /// when the body was empty or unreadable.
    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No greenhouse selected")]
    NoSelection,

    #[error("Greenhouse {0} is inactive")]
    UnitInactive(String),

    #[error("Unknown greenhouse: {0}")]
    UnknownUnit(String),

    #[error("Operation cancelled by operator")]
    Cancelled,

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Build the error for a non-2xx response from its status and body text.
    pub fn from_response(status: u16, body: Option<String>) -> Self {
        let detail = body
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));
        ConsoleError::Http { status, detail }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
