use serde::{Deserialize, Serialize};
use validator::Validate;

/// User profile as submitted for comparison, pairing or storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl UserProfile {
    /// Text sent to the embedding provider for this profile
    pub fn profile_text(&self) -> String {
        format!("Bio: {}\nInterests: {}", self.bio, self.interests.join(", "))
    }
}

/// Distance between two profiles' embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDistance {
    #[serde(rename = "user1Id")]
    pub user1_id: String,
    #[serde(rename = "user2Id")]
    pub user2_id: String,
    pub distance: f64,
}

/// Disjoint pairs of entities plus the leftover one when the count is odd
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub pairs: Vec<(String, String)>,
    pub unpaired: Option<String>,
}

impl Pairing {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether `id` appears in any committed pair
    pub fn is_paired(&self, id: &str) -> bool {
        self.pairs.iter().any(|(a, b)| a == id || b == id)
    }
}
