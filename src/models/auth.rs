use serde::{Deserialize, Serialize};

/// Request body for `POST /auth/signup`.
#[derive(Clone, Debug, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body of a successful login; the token is an opaque bearer token.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
