use std::collections::HashSet;

use crate::core::{distance::DistanceMatrix, error::PairingError};
use crate::models::Pairing;

/// Candidate pair in discovery order
struct Candidate<'a> {
    first: &'a str,
    second: &'a str,
    distance: f64,
}

/// Pair entities so that the largest distances are committed first
///
/// Candidate pairs are discovered in input order (`i < j`), sorted by
/// distance descending with ties keeping discovery order, and committed
/// greedily whenever both entities are still free. This is a greedy
/// approximation, not a maximum-weight matching: locking in the largest
/// remaining distance can strand an entity with only close partners.
///
/// # Arguments
/// * `entities` - Identifiers to pair; duplicates are rejected
/// * `distances` - A distance for every unordered pair of distinct entities
///
/// # Returns
/// Pairs oriented in input order, plus the leftover entity when the count is odd
pub fn pair_for_diversity(
    entities: &[String],
    distances: &DistanceMatrix,
) -> Result<Pairing, PairingError> {
    let mut known: HashSet<&str> = HashSet::with_capacity(entities.len());
    for id in entities {
        if !known.insert(id.as_str()) {
            return Err(PairingError::DuplicateEntity(id.clone()));
        }
    }

    if let Some(unknown) = distances.entities().find(|id| !known.contains(id)) {
        return Err(PairingError::UnknownEntity(unknown.to_string()));
    }

    let mut candidates = Vec::with_capacity(entities.len() * entities.len().saturating_sub(1) / 2);
    for (i, first) in entities.iter().enumerate() {
        for second in &entities[i + 1..] {
            let distance = distances.get(first, second).ok_or_else(|| {
                PairingError::IncompleteDistanceMatrix {
                    first: first.clone(),
                    second: second.clone(),
                }
            })?;

            if distance.is_nan() || distance < 0.0 {
                return Err(PairingError::InvalidDistance {
                    first: first.clone(),
                    second: second.clone(),
                    distance,
                });
            }

            candidates.push(Candidate {
                first,
                second,
                distance,
            });
        }
    }

    // Stable sort keeps discovery order among equal distances
    candidates.sort_by(|a, b| b.distance.total_cmp(&a.distance));

    let mut paired: HashSet<&str> = HashSet::with_capacity(entities.len());
    let mut pairs = Vec::with_capacity(entities.len() / 2);

    for candidate in candidates {
        // At most one entity left free
        if paired.len() + 1 >= entities.len() {
            break;
        }
        if paired.contains(candidate.first) || paired.contains(candidate.second) {
            continue;
        }

        paired.insert(candidate.first);
        paired.insert(candidate.second);
        pairs.push((candidate.first.to_string(), candidate.second.to_string()));
    }

    let unpaired = entities
        .iter()
        .find(|id| !paired.contains(id.as_str()))
        .cloned();

    Ok(Pairing { pairs, unpaired })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn matrix(entries: &[(&str, &str, f64)]) -> DistanceMatrix {
        let mut matrix = DistanceMatrix::new();
        for (a, b, d) in entries {
            matrix.insert(*a, *b, *d);
        }
        matrix
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_four_entities_largest_first() {
        let distances = matrix(&[
            ("A", "B", 1.0),
            ("A", "C", 5.0),
            ("A", "D", 2.0),
            ("B", "C", 3.0),
            ("B", "D", 4.0),
            ("C", "D", 6.0),
        ]);

        let pairing = pair_for_diversity(&ids(&["A", "B", "C", "D"]), &distances).unwrap();

        assert_eq!(pairing.pairs, vec![pair("C", "D"), pair("A", "B")]);
        assert_eq!(pairing.unpaired, None);
    }

    #[test]
    fn test_odd_count_leaves_one_unpaired() {
        let distances = matrix(&[("X", "Y", 2.0), ("X", "Z", 5.0), ("Y", "Z", 1.0)]);

        let pairing = pair_for_diversity(&ids(&["X", "Y", "Z"]), &distances).unwrap();

        assert_eq!(pairing.pairs, vec![pair("X", "Z")]);
        assert_eq!(pairing.unpaired, Some("Y".to_string()));
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let distances = matrix(&[
            ("A", "B", 1.0),
            ("A", "C", 1.0),
            ("A", "D", 1.0),
            ("B", "C", 1.0),
            ("B", "D", 1.0),
            ("C", "D", 1.0),
        ]);

        let pairing = pair_for_diversity(&ids(&["A", "B", "C", "D"]), &distances).unwrap();

        assert_eq!(pairing.pairs, vec![pair("A", "B"), pair("C", "D")]);
    }

    #[test]
    fn test_empty_and_single_entity() {
        let empty = pair_for_diversity(&[], &DistanceMatrix::new()).unwrap();
        assert!(empty.pairs.is_empty());
        assert_eq!(empty.unpaired, None);

        let single = pair_for_diversity(&ids(&["solo"]), &DistanceMatrix::new()).unwrap();
        assert!(single.pairs.is_empty());
        assert_eq!(single.unpaired, Some("solo".to_string()));
    }

    #[test]
    fn test_missing_distance_is_rejected() {
        let err = pair_for_diversity(&ids(&["A", "B"]), &DistanceMatrix::new()).unwrap_err();

        assert_eq!(
            err,
            PairingError::IncompleteDistanceMatrix {
                first: "A".to_string(),
                second: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_distance_is_rejected() {
        let distances = matrix(&[("A", "B", -0.5)]);

        let err = pair_for_diversity(&ids(&["A", "B"]), &distances).unwrap_err();
        assert!(matches!(err, PairingError::InvalidDistance { distance, .. } if distance == -0.5));
    }

    #[test]
    fn test_nan_distance_is_rejected() {
        let distances = matrix(&[("A", "B", f64::NAN)]);

        let err = pair_for_diversity(&ids(&["A", "B"]), &distances).unwrap_err();
        assert!(matches!(err, PairingError::InvalidDistance { .. }));
    }

    #[test]
    fn test_duplicate_entity_is_rejected() {
        let distances = matrix(&[("A", "B", 1.0)]);

        let err = pair_for_diversity(&ids(&["A", "B", "A"]), &distances).unwrap_err();
        assert_eq!(err, PairingError::DuplicateEntity("A".to_string()));
    }

    #[test]
    fn test_unknown_entity_in_matrix_is_rejected() {
        let distances = matrix(&[("A", "B", 1.0), ("A", "Q", 2.0), ("B", "Q", 3.0)]);

        let err = pair_for_diversity(&ids(&["A", "B"]), &distances).unwrap_err();
        assert_eq!(err, PairingError::UnknownEntity("Q".to_string()));
    }

    #[test]
    fn test_greedy_is_not_maximum_weight() {
        // Optimal would be AC + BD (10 + 10); greedy locks in AB first
        let distances = matrix(&[
            ("A", "B", 11.0),
            ("A", "C", 10.0),
            ("A", "D", 0.0),
            ("B", "C", 0.0),
            ("B", "D", 10.0),
            ("C", "D", 1.0),
        ]);

        let pairing = pair_for_diversity(&ids(&["A", "B", "C", "D"]), &distances).unwrap();

        assert_eq!(pairing.pairs, vec![pair("A", "B"), pair("C", "D")]);
    }
}
