use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload: the identity snapshot minted at login plus the standard
/// registered claims. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // user ID
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub aud: String,     // audience
}
