//! Error types for repository operations.
//!
//! Loading a snapshot or a configuration file can fail in a handful of ways;
//! each variant carries a structured [`ErrorContext`] so log lines say which
//! operation and which file was involved.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load_snapshot", "fetch_records")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "snapshot", "locality", "config")
    pub entity: Option<String>,
    /// Entity identifier, usually a path or a locality name
    pub entity_id: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested snapshot or file does not exist.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Snapshot content could not be parsed or failed validation.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration file or environment override is invalid.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::not_found_with_context(message, ErrorContext::default())
    }

    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn validation_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ValidationError {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::configuration_with_context(message, ErrorContext::default())
    }

    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::internal_with_context(message, ErrorContext::default())
    }

    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InternalError {
            message: message.into(),
            context,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Attach `ctx` to the error. Details already recorded by a `From`
    /// conversion are kept unless `ctx` carries its own.
    pub fn with_context(mut self, ctx: ErrorContext) -> Self {
        match &mut self {
            Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => {
                let details = ctx.details.or_else(|| context.details.take());
                *context = ErrorContext { details, ..ctx };
            }
        }
        self
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::validation_with_context(
            err.to_string(),
            ErrorContext::default()
                .with_details(format!("line={} column={}", err.line(), err.column())),
        )
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => RepositoryError::not_found(err.to_string()),
            _ => RepositoryError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("load_snapshot")
            .with_entity("snapshot")
            .with_entity_id("data/telemetry.json");
        assert_eq!(
            ctx.to_string(),
            "[operation=load_snapshot, entity=snapshot, id=data/telemetry.json]"
        );
        assert_eq!(ErrorContext::default().to_string(), "[]");
    }

    #[test]
    fn test_with_context_keeps_parse_position() {
        let parse = serde_json::from_str::<Vec<u32>>("[1, 2,").unwrap_err();
        let err = RepositoryError::from(parse)
            .with_context(ErrorContext::new("load_snapshot").with_entity("snapshot"));
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("load_snapshot"));
        assert_eq!(err.context().entity.as_deref(), Some("snapshot"));
        assert!(err.context().details.as_deref().unwrap().starts_with("line=1"));
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(
            RepositoryError::from(io),
            RepositoryError::NotFound { .. }
        ));
    }
}
