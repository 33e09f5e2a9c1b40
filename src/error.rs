#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Authorization declined by user")]
    UserDeclined,

    #[error("Spotify API error: {status} - {message}")]
    SpotifyApi { status: u16, message: String },

    #[error("Failed to bind callback listener: {0}")]
    ListenerBind(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
