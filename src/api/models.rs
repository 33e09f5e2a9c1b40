use serde::Deserialize;

/// Token endpoint response for both the authorization-code and
/// refresh-token grants. Spotify omits `refresh_token` on some refresh
/// responses; the caller keeps the previous one in that case.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Subset of `GET /me/player` we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub is_playing: bool,
}
