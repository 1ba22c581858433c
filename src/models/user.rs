//! Forum user model.

use serde::{Deserialize, Serialize};

/// A registered forum user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Registration does not record a reputation, so older entries may lack it.
    #[serde(default)]
    pub reputation: i64,
}

/// Request body for logging in as an existing user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: i64,
}

/// Request body for the registration stub.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
}
