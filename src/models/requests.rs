use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::UserProfile;

/// Request carrying profiles to compare or pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfilesRequest {
    #[validate(nested)]
    pub profiles: Vec<UserProfile>,
}

/// Request to pair users already held in the user store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PairStoredUsersRequest {
    #[serde(alias = "user_ids", rename = "userIds")]
    pub user_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_profile_validation() {
        let request: ProfilesRequest = serde_json::from_value(serde_json::json!({
            "profiles": [
                {"id": "a", "email": "a@example.com", "bio": "x", "interests": []},
                {"id": "b", "email": "nope", "bio": "y", "interests": []}
            ]
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_pair_stored_users_accepts_snake_case() {
        let request: PairStoredUsersRequest =
            serde_json::from_value(serde_json::json!({"user_ids": ["a", "b"]})).unwrap();

        assert_eq!(request.user_ids, vec!["a", "b"]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_pair_stored_users_accepts_empty_list() {
        let request: PairStoredUsersRequest =
            serde_json::from_value(serde_json::json!({"userIds": []})).unwrap();

        assert!(request.user_ids.is_empty());
        assert!(request.validate().is_ok());
    }
}
