/// Boxed source error carried by [`CoreError::Store`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failure reported by the persistence collaborator, passed through as-is.
    #[error("Store error: {0}")]
    Store(#[source] BoxError),
}

impl CoreError {
    /// Shorthand for a missing promotion addressed by `key`.
    pub fn promotion_not_found(key: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity: "Promotion",
            key: key.to_string(),
        }
    }
}
