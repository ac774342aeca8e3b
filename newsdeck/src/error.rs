use thiserror::Error;

/// Client error taxonomy.
///
/// Validation failures are returned to the caller before any network call.
/// Remote failures on user-initiated queries settle into the query state
/// rather than escaping; feed queries choose per call whether a data-source
/// error surfaces or is suppressed into an empty result.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Please enter a search query")]
    EmptyQuery,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{operation} failed: {status_text}")]
    Http {
        operation: &'static str,
        status_text: String,
    },

    #[error("Data source error: {0}")]
    DataSource(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
