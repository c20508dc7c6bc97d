//! # Wings HTTP Client
//!
//! Evaluation client for the Wings flag service: builds the evaluation request,
//! sends it over HTTPS with constant-backoff retry, and classifies failures
//! into the resolution error taxonomy.
//!
//! ## Features
//!
//! - **Constant Backoff**: Bounded attempts with a fixed wait between them
//! - **Error Classification**: 400 → `INVALID_CONTEXT`, 404 → `FLAG_NOT_FOUND`,
//!   anything else → `GENERAL`; 4xx never retried
//! - **Cancellation**: In-flight attempts and retry waits abort on a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken)
//! - **Pluggable Transport**: reqwest by default, or any [`Transport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wings_http_client::{
//!     ClientConfig, Credentials, EvaluationClient, EvaluationRequest, Evaluator, ValueType,
//! };
//! use wings_core::{CancellationToken, FlattenedContext};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder("flags.example.com")
//!         .max_retries(5)
//!         .retry_interval(Duration::from_millis(200))
//!         .credentials(Credentials::new("api-key", "api-key-id"))
//!         .build()?;
//!
//!     let client = EvaluationClient::new(config);
//!     let context = FlattenedContext::new();
//!     let response = client
//!         .evaluate(
//!             &CancellationToken::new(),
//!             ValueType::Bool.path(),
//!             http::Method::POST,
//!             &EvaluationRequest::new("new-ui", &context),
//!         )
//!         .await?;
//!
//!     println!("variant: {}", response.variant);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod model;
mod request;
mod response;
pub mod retry;
mod transport;

pub use client::{EvaluationClient, Evaluator};
pub use config::{
    API_KEY_HEADER, API_KEY_ID_HEADER, ClientConfig, ClientConfigBuilder, Credentials,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL,
};
pub use error::{EvaluationError, Result};
pub use model::{EvaluationRequest, EvaluationResponse, TypedValue, ValueType};
pub use request::Request;
pub use response::Response;
pub use retry::{AttemptError, BackoffStrategy, RetryConfig};
pub use transport::{ReqwestTransport, Transport, TransportSettings};

// Re-export common types
pub use bytes::Bytes;
pub use http::{Method, StatusCode};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use wings_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{EvaluationClient, Evaluator};
    pub use crate::config::{ClientConfig, ClientConfigBuilder, Credentials};
    pub use crate::error::{EvaluationError, Result};
    pub use crate::model::{EvaluationRequest, EvaluationResponse, ValueType};
    pub use crate::transport::{ReqwestTransport, Transport};
    pub use http::Method;
}
