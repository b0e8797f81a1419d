use crate::event::TelemetryEvent;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Delivers one event to the ingestion endpoint.
///
/// Any response received in time counts as delivered; the status code is not
/// inspected. The returned string is the response body, which must be UTF-8.
pub trait Publisher {
    fn publish(
        &self,
        event: &TelemetryEvent,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Failure to obtain a response from the endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Request(error)
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct PublisherBuildError(#[from] reqwest::Error);

/// JSON-over-HTTP publisher with a per-request deadline covering connect,
/// send and body read.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPublisher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PublisherBuildError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Publisher for HttpPublisher {
    async fn publish(&self, event: &TelemetryEvent) -> Result<String, TransportError> {
        let response = self.client.post(&self.endpoint).json(event).send().await?;
        let body = response.bytes().await?;
        Ok(String::from_utf8(body.to_vec())?)
    }
}
