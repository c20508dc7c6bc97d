//! Feature Flags for Wings
//!
//! [`WingsProvider`] resolves flags by asking the Wings evaluation service,
//! conforming to the [`FeatureProvider`](wings_core::FeatureProvider) contract.
//!
//! # Features
//!
//! - 🎯 **Typed Evaluation** - Bool, int, float, string and object flags
//! - 🛟 **Default Fallback** - Every call returns a value, even on failure
//! - 🔁 **Retry** - Transient failures retried with constant backoff
//! - 🏷️ **Variants** - The service's variant label travels with each result
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wings_features::*;
//!
//! # async fn run() -> Result<(), wings_http_client::EvaluationError> {
//! let provider = WingsProvider::for_host("flags.example.com")?;
//!
//! let context = EvaluationContext::new()
//!     .with_targeting_key("user-123")
//!     .with_attribute("plan", "enterprise")
//!     .flatten();
//!
//! let detail = provider
//!     .boolean_evaluation(&CancellationToken::new(), "new-ui", false, &context)
//!     .await;
//!
//! if detail.value {
//!     // Show new UI
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use wings_features::*;
//! use wings_http_client::{ClientConfig, Credentials};
//!
//! # fn run() -> Result<(), wings_http_client::EvaluationError> {
//! let config = ClientConfig::builder("flags.example.com")
//!     .max_retries(5)
//!     .retry_interval(Duration::from_millis(250))
//!     .credentials(Credentials::new("api-key", "api-key-id"))
//!     .build()?;
//!
//! let provider = WingsProvider::new(config);
//! # Ok(())
//! # }
//! ```

pub mod provider;

pub use provider::{PROVIDER_NAME, WingsProvider};
pub use wings_core::{
    CancellationToken, ErrorKind, EvaluationContext, FeatureProvider, FlattenedContext, Hook,
    ProviderMetadata, ResolutionDetail, ResolutionError,
};
