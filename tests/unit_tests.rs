// Unit tests for the diversity pairing engine

use diversity_pairing::core::{pair_for_diversity, DistanceMatrix, DiversityMatcher, PairingError};
use diversity_pairing::models::{Pairing, UserProfile};
use std::collections::HashSet;

fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("user-{}", i)).collect()
}

/// Complete matrix with scrambled but reproducible distances
fn scrambled_matrix(entities: &[String], seed: u64) -> DistanceMatrix {
    let mut state = seed;
    let mut matrix = DistanceMatrix::new();
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let distance = (state >> 33) as f64 / 1000.0;
            matrix.insert(entities[i].as_str(), entities[j].as_str(), distance);
        }
    }
    matrix
}

fn assert_mutually_exclusive(pairing: &Pairing) {
    let mut seen = HashSet::new();
    for (a, b) in &pairing.pairs {
        assert_ne!(a, b, "Entity paired with itself");
        assert!(seen.insert(a.clone()), "{} appears in two pairs", a);
        assert!(seen.insert(b.clone()), "{} appears in two pairs", b);
    }
    if let Some(unpaired) = &pairing.unpaired {
        assert!(!seen.contains(unpaired), "Unpaired entity {} is also paired", unpaired);
    }
}

fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        bio: format!("I am {}", id),
        interests: vec![],
    }
}

#[test]
fn test_zero_or_one_entity_gives_no_pairs() {
    for count in 0..=1 {
        let entities = ids(count);
        let pairing = pair_for_diversity(&entities, &DistanceMatrix::new()).unwrap();
        assert!(pairing.is_empty());
    }
}

#[test]
fn test_even_sizes_pair_everyone() {
    for count in (2..=12).step_by(2) {
        let entities = ids(count);
        let matrix = scrambled_matrix(&entities, count as u64);

        let pairing = pair_for_diversity(&entities, &matrix).unwrap();

        assert_eq!(pairing.pairs.len(), count / 2);
        assert_eq!(pairing.unpaired, None);
        assert_mutually_exclusive(&pairing);
        for id in &entities {
            assert!(pairing.is_paired(id), "{} was not paired", id);
        }
    }
}

#[test]
fn test_odd_sizes_leave_exactly_one_out() {
    for count in (3..=11).step_by(2) {
        let entities = ids(count);
        let matrix = scrambled_matrix(&entities, 7 + count as u64);

        let pairing = pair_for_diversity(&entities, &matrix).unwrap();

        assert_eq!(pairing.pairs.len(), (count - 1) / 2);
        assert_mutually_exclusive(&pairing);

        let left_out: Vec<&String> = entities.iter().filter(|id| !pairing.is_paired(id)).collect();
        assert_eq!(left_out.len(), 1);
        assert_eq!(pairing.unpaired.as_ref(), Some(left_out[0]));
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let entities = ids(9);
    let matrix = scrambled_matrix(&entities, 42);

    let first = pair_for_diversity(&entities, &matrix).unwrap();
    for _ in 0..5 {
        assert_eq!(pair_for_diversity(&entities, &matrix).unwrap(), first);
    }
}

#[test]
fn test_first_pair_has_largest_distance() {
    let entities = ids(8);
    let matrix = scrambled_matrix(&entities, 99);

    let pairing = pair_for_diversity(&entities, &matrix).unwrap();
    let (a, b) = &pairing.pairs[0];
    let committed = matrix.get(a, b).unwrap();

    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            assert!(matrix.get(&entities[i], &entities[j]).unwrap() <= committed);
        }
    }
}

#[test]
fn test_four_entity_scenario() {
    let entities: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
    let mut matrix = DistanceMatrix::new();
    matrix.insert("A", "B", 1.0);
    matrix.insert("A", "C", 5.0);
    matrix.insert("A", "D", 2.0);
    matrix.insert("B", "C", 3.0);
    matrix.insert("B", "D", 4.0);
    matrix.insert("C", "D", 6.0);

    let pairing = pair_for_diversity(&entities, &matrix).unwrap();

    assert_eq!(
        pairing.pairs,
        vec![
            ("C".to_string(), "D".to_string()),
            ("A".to_string(), "B".to_string()),
        ]
    );
}

#[test]
fn test_three_entity_scenario() {
    let entities: Vec<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
    let mut matrix = DistanceMatrix::new();
    matrix.insert("X", "Y", 2.0);
    matrix.insert("X", "Z", 5.0);
    matrix.insert("Y", "Z", 1.0);

    let pairing = pair_for_diversity(&entities, &matrix).unwrap();

    assert_eq!(pairing.pairs, vec![("X".to_string(), "Z".to_string())]);
    assert_eq!(pairing.unpaired.as_deref(), Some("Y"));
}

#[test]
fn test_missing_pair_scenario() {
    let entities = vec!["A".to_string(), "B".to_string()];

    let err = pair_for_diversity(&entities, &DistanceMatrix::new()).unwrap_err();

    assert!(matches!(err, PairingError::IncompleteDistanceMatrix { .. }));
    assert!(err.to_string().contains("(A, B)"));
}

#[test]
fn test_partial_matrix_is_rejected() {
    let entities = ids(4);
    let full = scrambled_matrix(&entities, 3);
    let mut matrix = DistanceMatrix::new();
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if (i, j) != (1, 3) {
                let distance = full.get(&entities[i], &entities[j]).unwrap();
                matrix.insert(entities[i].as_str(), entities[j].as_str(), distance);
            }
        }
    }

    let err = pair_for_diversity(&entities, &matrix).unwrap_err();
    assert_eq!(
        err,
        PairingError::IncompleteDistanceMatrix {
            first: "user-1".to_string(),
            second: "user-3".to_string(),
        }
    );
}

#[test]
fn test_matcher_pairs_embedded_profiles() {
    let matcher = DiversityMatcher::default();
    let profiles: Vec<UserProfile> = ["p", "q", "r", "s", "t"].iter().map(|id| profile(id)).collect();
    let embeddings = vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![10.0, 10.0],
        vec![5.0, 5.0],
    ];

    let pairing = matcher.pair(&profiles, &embeddings).unwrap();

    assert_eq!(pairing.pairs.len(), 2);
    assert_eq!(pairing.pairs[0], ("p".to_string(), "s".to_string()));
    assert_mutually_exclusive(&pairing);
}
