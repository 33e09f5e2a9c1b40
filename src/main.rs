use spottray::auth::callback;
use spottray::config::{AppConfig, UserPrefs};
use spottray::session::{AuthPrompt, Session, SystemBrowser};
use spottray::store::TokenStore;
use std::sync::Arc;

/// Console stand-in for the native confirmation dialog. The tray shell
/// swaps in its own `AuthPrompt` implementation.
struct ConsolePrompt;

impl AuthPrompt for ConsolePrompt {
    fn confirm_reauthorize(&self) -> bool {
        eprintln!("Spotify authorization required. Open the browser to authorize now? [y/N]");
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("spottray=info"))
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        let default_config = AppConfig::default();
        if let Err(save_err) = default_config.save() {
            log::error!("Failed to save default config: {}", save_err);
        }
        default_config
    });

    let prefs = UserPrefs::load().unwrap_or_else(|e| {
        log::warn!("Failed to load user prefs: {}. Using defaults.", e);
        UserPrefs::default()
    });
    log::info!("Auto-launch at login: {}", prefs.auto_launch);

    let token_path = AppConfig::token_path().expect("cannot resolve config directory");
    let store = TokenStore::new(token_path);

    let session = Session::new(
        config.clone(),
        store,
        Arc::new(ConsolePrompt),
        Arc::new(SystemBrowser),
    )
    .expect("failed to create HTTP client");

    // The listener stays bound for the process lifetime. Losing the port
    // disables interactive auth only; everything else keeps running in a
    // degraded, unauthenticated mode.
    match callback::bind(config.callback_port).await {
        Ok(listener) => {
            let server_session = Arc::clone(&session);
            tokio::spawn(async move {
                if let Err(e) = callback::serve(listener, server_session).await {
                    log::error!("Callback listener stopped: {}", e);
                }
            });
        }
        Err(e) => log::error!("{}. Interactive authorization is unavailable.", e),
    }

    session.startup().await;

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to wait for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
}
