// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{PairDistance, Pairing, UserProfile};
pub use requests::{PairStoredUsersRequest, ProfilesRequest};
pub use responses::{AddUserResponse, CompareProfilesResponse, ErrorResponse, HealthResponse, PairingResponse, ProfileText};
