// Wings - OpenFeature-style provider for the Wings flag evaluation service
//
// This library resolves feature flags remotely over HTTPS, retrying transient
// failures and falling back to caller defaults on error.

// Re-export the provider and contract
pub use wings_features::*;

// Re-export member crates
pub use wings_core;
pub use wings_features;
pub use wings_http_client;

pub use wings_http_client::{ClientConfig, ClientConfigBuilder, Credentials, EvaluationError};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CancellationToken, ClientConfig, Credentials, ErrorKind, EvaluationContext,
        FeatureProvider, FlattenedContext, ResolutionDetail, ResolutionError, WingsProvider,
    };
}
