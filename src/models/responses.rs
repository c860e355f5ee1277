use serde::{Deserialize, Serialize};
use crate::models::domain::{PairDistance, Pairing};

/// Profile id with the text that was embedded for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileText {
    pub id: String,
    pub profile: String,
}

/// Response for the compare profiles endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareProfilesResponse {
    pub profiles: Vec<ProfileText>,
    pub distances: Vec<PairDistance>,
}

/// Response for the pairing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingResponse {
    #[serde(rename = "pairingId")]
    pub pairing_id: String,
    #[serde(flatten)]
    pub pairing: Pairing,
    #[serde(rename = "totalProfiles")]
    pub total_profiles: usize,
}

/// Response for the add user endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUserResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "embeddingModel")]
    pub embedding_model: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
