//! Provider contract.

use crate::{FlattenedContext, ResolutionDetail, ResolutionError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Descriptive metadata about a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub name: String,
}

impl ProviderMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Callbacks a provider asks the host SDK to run around each evaluation.
///
/// Every method defaults to a no-op.
pub trait Hook: Send + Sync {
    /// Called before a flag is resolved.
    fn before(&self, _flag: &str, _context: &FlattenedContext) {}

    /// Called when resolution fails.
    fn error(&self, _flag: &str, _error: &ResolutionError) {}

    /// Called once resolution is over, whatever the outcome.
    fn finally(&self, _flag: &str) {}
}

/// A backing service able to resolve flags of every supported type.
///
/// Each method is total: failures are reported through
/// [`ResolutionDetail::error`] with `default_value` as the value. Cancelling
/// `cancel` aborts in-flight work and resolves to the default.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    /// Provider metadata.
    fn metadata(&self) -> ProviderMetadata;

    /// Hooks the host SDK should run for this provider. None by default.
    fn hooks(&self) -> Vec<Arc<dyn Hook>> {
        Vec::new()
    }

    /// Resolve a boolean flag.
    async fn boolean_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: bool,
        context: &FlattenedContext,
    ) -> ResolutionDetail<bool>;

    /// Resolve an integer flag.
    async fn int_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: i64,
        context: &FlattenedContext,
    ) -> ResolutionDetail<i64>;

    /// Resolve a floating point flag.
    async fn float_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: f64,
        context: &FlattenedContext,
    ) -> ResolutionDetail<f64>;

    /// Resolve a string flag.
    async fn string_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: String,
        context: &FlattenedContext,
    ) -> ResolutionDetail<String>;

    /// Resolve a structured (JSON) flag.
    async fn object_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: Value,
        context: &FlattenedContext,
    ) -> ResolutionDetail<Value>;
}
