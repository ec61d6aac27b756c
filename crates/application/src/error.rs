//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Upstream provider failed (transport, status or decode)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if a later attempt could succeed without operator action
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_convert_transparently() {
        let err: ApplicationError = DomainError::NoReadings.into();
        assert_eq!(err.to_string(), DomainError::NoReadings.to_string());
    }

    #[test]
    fn only_external_service_is_transient() {
        assert!(ApplicationError::ExternalService("HTTP 500".into()).is_transient());
        assert!(!ApplicationError::Configuration("no key".into()).is_transient());
        assert!(!ApplicationError::NotFound("Atlantis".into()).is_transient());
        assert!(!ApplicationError::Internal("bug".into()).is_transient());
    }
}
