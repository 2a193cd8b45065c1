use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Form3Error {
    #[error("missing base url: set {0} or pass it explicitly")]
    MissingBaseUrl(&'static str),

    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("request path must be relative, got {0:?}")]
    AbsolutePath(String),

    #[error("invalid request path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("failed to decode response body (status {}): {source}", .response.status)]
    Decode {
        response: RawResponse,
        #[source]
        source: serde_json::Error,
    },
}

impl Form3Error {
    /// HTTP status of the response that caused the error, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Form3Error::Response(err) => Some(err.status),
            Form3Error::Decode { response, .. } => Some(response.status),
            Form3Error::Http(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Form3Error::Cancelled)
    }
}

/// A non-2xx response returned by the API.
#[derive(Debug, Clone, Error)]
pub struct ResponseError {
    pub status: StatusCode,
    pub method: Method,
    pub url: Url,
    /// `error_message` from the body, the raw body text, or empty.
    pub message: String,
}

impl ResponseError {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {}",
            self.method,
            self.url,
            self.status.as_u16(),
            self.message
        )
    }
}

/// Response that could not be decoded into the expected shape.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
