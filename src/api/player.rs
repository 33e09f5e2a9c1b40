use crate::api::client::SpotifyClient;
use crate::api::models::PlayerState;
use crate::error::AppResult;

impl SpotifyClient {
    /// Probe a lightweight authenticated endpoint to see whether the
    /// current access token is still accepted. Any failure, transport or
    /// provider, counts as "not valid" rather than an error.
    pub async fn check_token(&self) -> bool {
        match self.get("/me").await {
            Ok(_) => true,
            Err(e) => {
                log::info!("Access token validity probe failed: {}", e);
                false
            }
        }
    }

    /// Current playback state. Spotify answers 204 with an empty body when
    /// no device is active; treat that as "not playing".
    pub async fn fetch_player_state(&self) -> AppResult<PlayerState> {
        let response = self.get("/me/player").await?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(PlayerState { is_playing: false });
        }

        let state: PlayerState = response.json().await?;
        Ok(state)
    }

    pub async fn play(&self) -> AppResult<()> {
        self.put("/me/player/play").await?;
        log::info!("Playback started");
        Ok(())
    }

    pub async fn pause(&self) -> AppResult<()> {
        self.put("/me/player/pause").await?;
        log::info!("Playback paused");
        Ok(())
    }

    pub async fn next_track(&self) -> AppResult<()> {
        self.post("/me/player/next").await?;
        log::info!("Skipped to next track");
        Ok(())
    }

    pub async fn previous_track(&self) -> AppResult<()> {
        self.post("/me/player/previous").await?;
        log::info!("Skipped to previous track");
        Ok(())
    }
}
