//! Wings Provider
//!
//! Adapts the evaluation client to the per-type provider contract and applies
//! the default-value fallback.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use wings_core::{
    CancellationToken, FeatureProvider, FlattenedContext, ProviderMetadata, ResolutionDetail,
    ResolutionError,
};
use wings_http_client::{
    ClientConfig, EvaluationClient, EvaluationError, EvaluationRequest, EvaluationResponse,
    Evaluator, Method, ValueType,
};

/// Name reported in provider metadata.
pub const PROVIDER_NAME: &str = "wings";

const EMPTY_FLAG_MESSAGE: &str = "flag must be non-empty";

/// Feature provider backed by the Wings evaluation service.
#[derive(Clone)]
pub struct WingsProvider {
    evaluator: Arc<dyn Evaluator>,
}

impl WingsProvider {
    /// Create a provider evaluating through an [`EvaluationClient`].
    pub fn new(config: ClientConfig) -> Self {
        Self::with_evaluator(Arc::new(EvaluationClient::new(config)))
    }

    /// Create a provider for `host` with default client settings.
    pub fn for_host(host: impl Into<String>) -> wings_http_client::Result<Self> {
        Ok(Self::with_evaluator(Arc::new(EvaluationClient::for_host(
            host,
        )?)))
    }

    /// Create a provider on top of any evaluator.
    pub fn with_evaluator(evaluator: Arc<dyn Evaluator>) -> Self {
        Self { evaluator }
    }

    /// Evaluate `flag` as `value_type`, falling back to `default_value`.
    async fn resolve<T: Send>(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: T,
        context: &FlattenedContext,
        value_type: ValueType,
        extract: fn(EvaluationResponse) -> Option<T>,
    ) -> ResolutionDetail<T> {
        let metadata = context.clone();

        if flag.is_empty() {
            return ResolutionDetail::fallback(
                default_value,
                ResolutionError::general(EMPTY_FLAG_MESSAGE),
                metadata,
            );
        }

        let request = EvaluationRequest::new(flag, context);
        let result = self
            .evaluator
            .evaluate(cancel, value_type.path(), Method::POST, &request)
            .await;

        match result {
            Ok(mut response) => {
                let variant = std::mem::take(&mut response.variant);
                match extract(response) {
                    Some(value) => ResolutionDetail::resolved(value, variant, metadata),
                    None => {
                        let error = ResolutionError::general(format!(
                            "response for flag {flag:?} carries no {value_type} value"
                        ));
                        debug!(flag, %error, "Falling back to default value");
                        ResolutionDetail::fallback(default_value, error, metadata)
                    }
                }
            }
            Err(e) => {
                let error = match e {
                    EvaluationError::Resolution(e) => e,
                    other => ResolutionError::general(other.to_string()),
                };
                debug!(flag, %error, "Falling back to default value");
                ResolutionDetail::fallback(default_value, error, metadata)
            }
        }
    }
}

impl std::fmt::Debug for WingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WingsProvider")
            .field("name", &PROVIDER_NAME)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FeatureProvider for WingsProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata::new(PROVIDER_NAME)
    }

    async fn boolean_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: bool,
        context: &FlattenedContext,
    ) -> ResolutionDetail<bool> {
        self.resolve(cancel, flag, default_value, context, ValueType::Bool, |r| {
            r.bool_value()
        })
        .await
    }

    async fn int_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: i64,
        context: &FlattenedContext,
    ) -> ResolutionDetail<i64> {
        self.resolve(cancel, flag, default_value, context, ValueType::Int, |r| {
            r.int_value()
        })
        .await
    }

    async fn float_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: f64,
        context: &FlattenedContext,
    ) -> ResolutionDetail<f64> {
        self.resolve(cancel, flag, default_value, context, ValueType::Float, |r| {
            r.float_value()
        })
        .await
    }

    async fn string_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: String,
        context: &FlattenedContext,
    ) -> ResolutionDetail<String> {
        self.resolve(
            cancel,
            flag,
            default_value,
            context,
            ValueType::String,
            EvaluationResponse::into_string_value,
        )
        .await
    }

    async fn object_evaluation(
        &self,
        cancel: &CancellationToken,
        flag: &str,
        default_value: Value,
        context: &FlattenedContext,
    ) -> ResolutionDetail<Value> {
        self.resolve(
            cancel,
            flag,
            default_value,
            context,
            ValueType::Object,
            EvaluationResponse::into_object_value,
        )
        .await
    }
}
