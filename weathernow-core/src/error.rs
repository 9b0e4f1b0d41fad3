use reqwest::StatusCode;

/// Failure talking to one of the upstream HTTP services.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to send request to {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a search did not produce weather data.
///
/// The `Display` text is the message shown to the user; the underlying fetch
/// failure is kept as the error source for logging.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("City not found")]
    NotFound,

    #[error("Failed to fetch weather data.")]
    Fetch(#[from] FetchError),
}

impl SearchError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
