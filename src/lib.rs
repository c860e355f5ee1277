//! Diversity Pairing - embedding-based pairing service for user profiles
//!
//! Profiles are embedded through a third-party embedding API, compared by
//! Euclidean distance, and greedily paired so that the most dissimilar
//! profiles are matched first.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{pair_for_diversity, DistanceMatrix, DiversityMatcher, PairingError};
pub use models::{PairDistance, Pairing, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let mut distances = DistanceMatrix::new();
        distances.insert("a", "b", 1.0);

        let pairing = pair_for_diversity(&["a".to_string(), "b".to_string()], &distances).unwrap();
        assert_eq!(pairing.pairs.len(), 1);
    }
}
