//! User DTOs

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `POST /users/{id}/queries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCollection {
    pub query_name: String,
}
