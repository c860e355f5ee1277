// Core algorithm exports
pub mod distance;
pub mod error;
pub mod matcher;
pub mod pairing;

pub use distance::{euclidean_distance, DistanceMatrix};
pub use error::PairingError;
pub use matcher::{DiversityMatcher, DEFAULT_MAX_PROFILES};
pub use pairing::pair_for_diversity;
