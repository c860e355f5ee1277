use thiserror::Error;

/// Errors raised while building distances or pairing entities
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairingError {
    #[error("Incomplete distance matrix: no distance for pair ({first}, {second})")]
    IncompleteDistanceMatrix { first: String, second: String },

    #[error("Invalid distance {distance} for pair ({first}, {second}): distances must be non-negative")]
    InvalidDistance {
        first: String,
        second: String,
        distance: f64,
    },

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Distance matrix references unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Too many profiles: {actual} exceeds the limit of {max}")]
    TooManyProfiles { max: usize, actual: usize },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} embeddings, got {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    #[error("Embedding for {0} contains non-finite components")]
    NonFiniteEmbedding(String),
}

impl PairingError {
    /// Whether the error was caused by the caller's input rather than the
    /// embedding provider's output
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            PairingError::DimensionMismatch { .. }
                | PairingError::EmbeddingCountMismatch { .. }
                | PairingError::NonFiniteEmbedding(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_pair() {
        let err = PairingError::IncompleteDistanceMatrix {
            first: "A".to_string(),
            second: "B".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Incomplete distance matrix: no distance for pair (A, B)"
        );
    }

    #[test]
    fn test_caller_error_classification() {
        assert!(PairingError::DuplicateEntity("A".to_string()).is_caller_error());
        assert!(!PairingError::DimensionMismatch { expected: 3, actual: 2 }.is_caller_error());
        assert!(!PairingError::NonFiniteEmbedding("A".to_string()).is_caller_error());
    }
}
