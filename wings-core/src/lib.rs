//! # Wings Core
//!
//! The flag evaluation contract that Wings providers conform to.
//!
//! A provider resolves a flag key against a flattened evaluation context and
//! returns a [`ResolutionDetail`] carrying the resolved value, the variant that
//! produced it, and an optional [`ResolutionError`]. Evaluation never fails
//! outward: on error the caller's default value is returned alongside the
//! classified error.
//!
//! ## Error kinds
//!
//! | Kind              | Meaning                                      |
//! |-------------------|----------------------------------------------|
//! | `GENERAL`         | Unclassified failure                         |
//! | `INVALID_CONTEXT` | The evaluation context was rejected          |
//! | `FLAG_NOT_FOUND`  | The flag key does not exist                  |
//!
//! ## Building a context
//!
//! ```
//! use wings_core::EvaluationContext;
//!
//! let context = EvaluationContext::new()
//!     .with_targeting_key("user-123")
//!     .with_attribute("plan", "enterprise")
//!     .with_attribute("seats", 42);
//!
//! let flattened = context.flatten();
//! assert_eq!(flattened["targetingKey"], "user-123");
//! assert_eq!(flattened["seats"], 42);
//! ```

pub mod context;
pub mod detail;
pub mod error;
pub mod provider;

pub use context::{EvaluationContext, FlattenedContext, TARGETING_KEY};
pub use detail::ResolutionDetail;
pub use error::{ErrorKind, ResolutionError};
pub use provider::{FeatureProvider, Hook, ProviderMetadata};

// Re-exported so callers can drive cancellation without a direct dependency.
pub use tokio_util::sync::CancellationToken;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::context::{EvaluationContext, FlattenedContext};
    pub use crate::detail::ResolutionDetail;
    pub use crate::error::{ErrorKind, ResolutionError};
    pub use crate::provider::{FeatureProvider, Hook, ProviderMetadata};
    pub use tokio_util::sync::CancellationToken;
}
