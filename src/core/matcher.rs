use std::collections::HashSet;

use crate::core::{distance::DistanceMatrix, error::PairingError, pairing::pair_for_diversity};
use crate::models::{PairDistance, Pairing, UserProfile};

/// Default cap on the number of profiles handled in a single request
pub const DEFAULT_MAX_PROFILES: usize = 500;

/// Matching orchestrator - turns profiles and their embeddings into results
///
/// # Pipeline Stages
/// 1. Boundary validation (size cap, duplicate ids)
/// 2. Pairwise Euclidean distance matrix
/// 3. Either a sorted distance listing or a diversity pairing
#[derive(Debug, Clone)]
pub struct DiversityMatcher {
    max_profiles: usize,
}

impl DiversityMatcher {
    pub fn new(max_profiles: usize) -> Self {
        Self { max_profiles }
    }

    pub fn max_profiles(&self) -> usize {
        self.max_profiles
    }

    /// Reject inputs the engine must never see
    pub fn validate(&self, profiles: &[UserProfile]) -> Result<(), PairingError> {
        if profiles.len() > self.max_profiles {
            return Err(PairingError::TooManyProfiles {
                max: self.max_profiles,
                actual: profiles.len(),
            });
        }

        let mut seen = HashSet::with_capacity(profiles.len());
        for profile in profiles {
            if !seen.insert(profile.id.as_str()) {
                return Err(PairingError::DuplicateEntity(profile.id.clone()));
            }
        }

        Ok(())
    }

    /// Build the distance matrix for profiles and their embeddings
    ///
    /// `embeddings[i]` must belong to `profiles[i]`.
    pub fn distance_matrix(
        &self,
        profiles: &[UserProfile],
        embeddings: &[Vec<f32>],
    ) -> Result<DistanceMatrix, PairingError> {
        self.validate(profiles)?;
        DistanceMatrix::from_embeddings(&profile_ids(profiles), embeddings)
    }

    /// List every pair's distance, most similar first
    ///
    /// Equal distances keep discovery order (`i < j` over the input).
    pub fn compare(
        &self,
        profiles: &[UserProfile],
        embeddings: &[Vec<f32>],
    ) -> Result<Vec<PairDistance>, PairingError> {
        let matrix = self.distance_matrix(profiles, embeddings)?;

        let mut distances = Vec::with_capacity(matrix.pair_count());
        for (i, first) in profiles.iter().enumerate() {
            for second in &profiles[i + 1..] {
                let distance = matrix.get(&first.id, &second.id).ok_or_else(|| {
                    PairingError::IncompleteDistanceMatrix {
                        first: first.id.clone(),
                        second: second.id.clone(),
                    }
                })?;

                distances.push(PairDistance {
                    user1_id: first.id.clone(),
                    user2_id: second.id.clone(),
                    distance,
                });
            }
        }

        distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        Ok(distances)
    }

    /// Pair profiles for maximum diversity
    pub fn pair(
        &self,
        profiles: &[UserProfile],
        embeddings: &[Vec<f32>],
    ) -> Result<Pairing, PairingError> {
        let matrix = self.distance_matrix(profiles, embeddings)?;
        let pairing = pair_for_diversity(&profile_ids(profiles), &matrix)?;

        tracing::debug!(
            "Paired {} profiles into {} pairs (unpaired: {:?})",
            profiles.len(),
            pairing.pairs.len(),
            pairing.unpaired
        );

        Ok(pairing)
    }
}

impl Default for DiversityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROFILES)
    }
}

fn profile_ids(profiles: &[UserProfile]) -> Vec<String> {
    profiles.iter().map(|p| p.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_profile(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            bio: format!("Bio of {}", id),
            interests: vec!["hacking".to_string()],
        }
    }

    #[test]
    fn test_compare_sorted_ascending() {
        let matcher = DiversityMatcher::default();
        let profiles = vec![create_profile("a"), create_profile("b"), create_profile("c")];
        let embeddings = vec![vec![0.0], vec![10.0], vec![1.0]];

        let distances = matcher.compare(&profiles, &embeddings).unwrap();

        let order: Vec<(&str, &str)> = distances
            .iter()
            .map(|d| (d.user1_id.as_str(), d.user2_id.as_str()))
            .collect();
        assert_eq!(order, vec![("a", "c"), ("b", "c"), ("a", "b")]);
        assert!((distances[0].distance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pair_profiles() {
        let matcher = DiversityMatcher::default();
        let profiles = vec![
            create_profile("a"),
            create_profile("b"),
            create_profile("c"),
            create_profile("d"),
        ];
        let embeddings = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];

        let pairing = matcher.pair(&profiles, &embeddings).unwrap();

        assert_eq!(
            pairing.pairs,
            vec![
                ("a".to_string(), "d".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
        assert_eq!(pairing.unpaired, None);
    }

    #[test]
    fn test_rejects_duplicate_profiles() {
        let matcher = DiversityMatcher::default();
        let profiles = vec![create_profile("a"), create_profile("a")];

        let err = matcher.validate(&profiles).unwrap_err();
        assert_eq!(err, PairingError::DuplicateEntity("a".to_string()));
    }

    #[test]
    fn test_rejects_too_many_profiles() {
        let matcher = DiversityMatcher::new(2);
        let profiles = vec![create_profile("a"), create_profile("b"), create_profile("c")];
        let embeddings = vec![vec![0.0], vec![1.0], vec![2.0]];

        let err = matcher.pair(&profiles, &embeddings).unwrap_err();
        assert_eq!(err, PairingError::TooManyProfiles { max: 2, actual: 3 });
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let matcher = DiversityMatcher::default();

        assert!(matcher.compare(&[], &[]).unwrap().is_empty());
        assert_eq!(matcher.pair(&[], &[]).unwrap(), Pairing::default());
    }
}
