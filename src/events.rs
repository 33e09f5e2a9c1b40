use serde::Serialize;

/// Name of the event broadcast to UI surfaces when a new token arrives.
pub const AUTH_SUCCESS: &str = "auth-success";

/// Payload carried by [`AUTH_SUCCESS`] broadcasts.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccessPayload {
    pub access_token: String,
}
