use std::collections::HashMap;

use crate::core::error::PairingError;

/// Calculate the Euclidean distance between two embedding vectors
///
/// Components are accumulated in `f64` so long vectors don't lose precision.
/// Callers must ensure both vectors have the same length; extra components
/// of the longer vector are ignored.
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Symmetric distances between unordered pairs of distinct entities
///
/// Every value is stored under both orientations, so `get(a, b)` and
/// `get(b, a)` always agree.
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    distances: HashMap<String, HashMap<String, f64>>,
    pair_count: usize,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the distance between `a` and `b`
    ///
    /// Self-pairs are ignored. Returns the previous value when the pair was
    /// already present.
    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>, distance: f64) -> Option<f64> {
        let a = a.into();
        let b = b.into();
        if a == b {
            return None;
        }

        let previous = self
            .distances
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), distance);
        self.distances.entry(b).or_default().insert(a, distance);

        if previous.is_none() {
            self.pair_count += 1;
        }
        previous
    }

    /// Distance between `a` and `b`, in either order
    #[inline]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.distances.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Identifiers that appear in at least one pair
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.distances.keys().map(String::as_str)
    }

    /// Number of unordered pairs with a recorded distance
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn is_empty(&self) -> bool {
        self.pair_count == 0
    }

    /// Build the matrix of Euclidean distances between embeddings
    ///
    /// `ids[i]` names `embeddings[i]`. All vectors must share the first
    /// vector's dimension and hold only finite components.
    pub fn from_embeddings(ids: &[String], embeddings: &[Vec<f32>]) -> Result<Self, PairingError> {
        if ids.len() != embeddings.len() {
            return Err(PairingError::EmbeddingCountMismatch {
                expected: ids.len(),
                actual: embeddings.len(),
            });
        }

        if let Some(first) = embeddings.first() {
            let expected = first.len();
            if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
                return Err(PairingError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        if let Some(i) = embeddings
            .iter()
            .position(|e| e.iter().any(|x| !x.is_finite()))
        {
            return Err(PairingError::NonFiniteEmbedding(ids[i].clone()));
        }

        let mut matrix = Self::new();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let distance = euclidean_distance(&embeddings[i], &embeddings[j]);
                matrix.insert(ids[i].as_str(), ids[j].as_str(), distance);
            }
        }

        Ok(matrix)
    }
}
