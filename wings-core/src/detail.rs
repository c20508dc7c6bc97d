//! Resolution detail envelope.

use crate::{ErrorKind, FlattenedContext, ResolutionError};

/// Result of a single flag evaluation.
///
/// Always carries a usable `value`: the resolved one on success, the caller's
/// default on failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionDetail<T> {
    /// Resolved value, or the caller's default when `error` is set.
    pub value: T,
    /// Variant that produced the value. `None` on failure.
    pub variant: Option<String>,
    /// Metadata echoed back with the result.
    pub flag_metadata: FlattenedContext,
    /// Classified failure, if any.
    pub error: Option<ResolutionError>,
}

impl<T> ResolutionDetail<T> {
    /// Successful resolution.
    pub fn resolved(value: T, variant: impl Into<String>, flag_metadata: FlattenedContext) -> Self {
        Self {
            value,
            variant: Some(variant.into()),
            flag_metadata,
            error: None,
        }
    }

    /// Failed resolution falling back to `default_value`.
    pub fn fallback(
        default_value: T,
        error: ResolutionError,
        flag_metadata: FlattenedContext,
    ) -> Self {
        Self {
            value: default_value,
            variant: None,
            flag_metadata,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ResolutionError::kind)
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keeps_default() {
        let detail = ResolutionDetail::fallback(
            7_i64,
            ResolutionError::invalid_context("missing plan"),
            FlattenedContext::new(),
        );

        assert_eq!(detail.value, 7);
        assert!(detail.is_error());
        assert_eq!(detail.error_kind(), Some(ErrorKind::InvalidContext));
        assert_eq!(detail.variant(), None);
    }

    #[test]
    fn test_resolved_has_variant() {
        let detail = ResolutionDetail::resolved(true, "on", FlattenedContext::new());
        assert!(!detail.is_error());
        assert_eq!(detail.variant(), Some("on"));
    }
}
