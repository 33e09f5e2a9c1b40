use crate::api::client::SpotifyClient;
use crate::api::models::TokenResponse;
use crate::auth::oauth;
use crate::auth::pkce::PkceChallenge;
use crate::auth::scheme;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::events::AuthSuccessPayload;
use crate::store::{TokenPair, TokenStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    CheckingValidity,
    Refreshing,
    AwaitingInteractiveAuth,
    Authenticated,
}

/// Authorization outcome delivered by either callback path: the loopback
/// listener hands over an authorization code, the OS scheme activation a
/// ready-made access token. Both funnel into
/// [`Session::complete_authorization`].
#[derive(Debug, Clone)]
pub enum AuthorizationGrant {
    Code(String),
    AccessToken(String),
}

/// User-facing consent dialog, injected so tests can script the answer.
pub trait AuthPrompt: Send + Sync {
    fn confirm_reauthorize(&self) -> bool;
}

/// Fire-and-forget external browser launch, injected for the same reason.
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> AppResult<()>;
}

/// Default opener backed by the system browser.
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> AppResult<()> {
        webbrowser::open(url)?;
        Ok(())
    }
}

/// The session orchestrator: owns all auth state and sequences the
/// validity-check -> refresh -> re-authorization chain.
pub struct Session {
    client: Arc<SpotifyClient>,
    config: AppConfig,
    store: TokenStore,
    tokens: Arc<RwLock<TokenPair>>,
    state: RwLock<SessionState>,
    /// Verifier of the current interactive attempt. Single slot: starting a
    /// new attempt replaces it, completing one consumes it.
    pkce_verifier: Mutex<Option<String>>,
    is_playing: AtomicBool,
    auth_events: broadcast::Sender<AuthSuccessPayload>,
    prompt: Arc<dyn AuthPrompt>,
    browser: Arc<dyn BrowserOpener>,
}

impl Session {
    pub fn new(
        config: AppConfig,
        store: TokenStore,
        prompt: Arc<dyn AuthPrompt>,
        browser: Arc<dyn BrowserOpener>,
    ) -> AppResult<Arc<Self>> {
        let tokens = Arc::new(RwLock::new(TokenPair::default()));
        let client = Arc::new(SpotifyClient::new(config.api_url.clone(), Arc::clone(&tokens))?);
        let (auth_events, _) = broadcast::channel(16);

        Ok(Arc::new(Self {
            client,
            config,
            store,
            tokens,
            state: RwLock::new(SessionState::Unauthenticated),
            pkce_verifier: Mutex::new(None),
            is_playing: AtomicBool::new(false),
            auth_events,
            prompt,
            browser,
        }))
    }

    /// Startup chain: load persisted tokens, probe validity, fall back to a
    /// refresh, and only then ask the user to re-authorize interactively.
    pub async fn startup(&self) {
        let loaded = match self.store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("Failed to load token store: {}", e);
                None
            }
        };

        let Some(pair) = loaded.filter(|p| !p.is_empty()) else {
            log::info!("No persisted tokens, interactive authorization required");
            let _ = self.request_interactive_auth().await;
            return;
        };

        *self.tokens.write().await = pair;
        *self.state.write().await = SessionState::CheckingValidity;

        if self.client.check_token().await {
            *self.state.write().await = SessionState::Authenticated;
            self.refresh_player_state().await;
            return;
        }

        if !self.try_refresh().await {
            let _ = self.request_interactive_auth().await;
        }
    }

    async fn try_refresh(&self) -> bool {
        let Some(refresh_token) = self.tokens.read().await.refresh_token.clone() else {
            return false;
        };

        *self.state.write().await = SessionState::Refreshing;

        let result = oauth::exchange_refresh(
            self.client.http_client(),
            &self.config.token_url(),
            &self.config.client_id,
            &refresh_token,
        )
        .await;

        match result {
            Ok(token) => {
                if let Err(e) = self.apply_token_response(token).await {
                    log::error!("Failed to persist refreshed tokens: {}", e);
                    return false;
                }
                *self.state.write().await = SessionState::Authenticated;
                log::info!("Access token refreshed");
                self.refresh_player_state().await;
                self.broadcast_token().await;
                true
            }
            Err(e) => {
                log::warn!("Token refresh failed: {}", e);
                false
            }
        }
    }

    /// Ask the user for consent, then kick off the browser flow. Declining
    /// leaves the session unauthenticated; any later playback attempt asks
    /// again.
    pub async fn request_interactive_auth(&self) -> AppResult<()> {
        *self.state.write().await = SessionState::AwaitingInteractiveAuth;

        let prompt = Arc::clone(&self.prompt);
        let approved = tokio::task::spawn_blocking(move || prompt.confirm_reauthorize())
            .await
            .unwrap_or(false);

        if approved {
            self.begin_interactive_auth().await;
            Ok(())
        } else {
            log::info!("User declined re-authorization");
            *self.state.write().await = SessionState::Unauthenticated;
            Err(AppError::UserDeclined)
        }
    }

    /// Generate a fresh PKCE pair and open the authorization URL. Replacing
    /// the verifier slot invalidates any URL built from a previous pair.
    pub async fn begin_interactive_auth(&self) {
        let pkce = PkceChallenge::generate();
        let url = oauth::build_authorize_url(
            &self.config.authorize_url(),
            &self.config.client_id,
            &self.config.redirect_uri(),
            &self.config.scope,
            &pkce.challenge,
        );
        *self.pkce_verifier.lock().await = Some(pkce.verifier);

        log::info!("Opening authorization URL in browser");
        if let Err(e) = self.browser.open(&url) {
            log::error!("Failed to open browser for authorization: {}", e);
        }
    }

    /// Single entry point for both callback delivery paths.
    pub async fn complete_authorization(&self, grant: AuthorizationGrant) -> AppResult<()> {
        match grant {
            AuthorizationGrant::Code(code) => {
                let verifier = self
                    .pkce_verifier
                    .lock()
                    .await
                    .take()
                    .ok_or(AppError::AuthRequired)?;

                let token = oauth::exchange_code(
                    self.client.http_client(),
                    &self.config.token_url(),
                    &self.config.client_id,
                    &self.config.redirect_uri(),
                    &code,
                    &verifier,
                )
                .await?;

                self.apply_token_response(token).await?;
            }
            AuthorizationGrant::AccessToken(token) => {
                // Scheme activations forward only the access token. The
                // refresh token stays whatever the last code exchange
                // stored, and nothing new is persisted here.
                let mut tokens = self.tokens.write().await;
                tokens.access_token = Some(token);
            }
        }

        *self.state.write().await = SessionState::Authenticated;
        log::info!("Authorization completed");
        self.refresh_player_state().await;
        self.broadcast_token().await;
        Ok(())
    }

    /// OS forwarded a custom-scheme URL to us. Anything that is not a
    /// well-formed `myapp://auth-success` activation is ignored.
    pub async fn handle_scheme_activation(&self, raw: &str) {
        let Some(token) = scheme::parse_activation(raw) else {
            return;
        };
        if let Err(e) = self
            .complete_authorization(AuthorizationGrant::AccessToken(token))
            .await
        {
            log::error!("Scheme activation failed: {}", e);
        }
    }

    /// Store the exchange result, keeping the previous refresh token when
    /// the response omits one, and persist the whole pair.
    async fn apply_token_response(&self, token: TokenResponse) -> AppResult<()> {
        let mut tokens = self.tokens.write().await;
        tokens.access_token = Some(token.access_token);
        if let Some(rt) = token.refresh_token {
            tokens.refresh_token = Some(rt);
        }
        let snapshot = tokens.clone();
        drop(tokens);

        self.store.save(&snapshot)
    }

    async fn broadcast_token(&self) {
        if let Some(token) = self.tokens.read().await.access_token.clone() {
            log::debug!("Broadcasting {} to subscribers", crate::events::AUTH_SUCCESS);
            let _ = self.auth_events.send(AuthSuccessPayload {
                access_token: token,
            });
        }
    }

    async fn refresh_player_state(&self) {
        match self.client.fetch_player_state().await {
            Ok(state) => {
                self.is_playing.store(state.is_playing, Ordering::SeqCst);
            }
            Err(e) => log::warn!("Failed to fetch player state: {}", e),
        }
    }

    /// Playback actions short-circuit into the re-auth prompt instead of
    /// issuing a doomed API call when no access token is held.
    async fn require_token(&self) -> AppResult<()> {
        if self.tokens.read().await.access_token.is_none() {
            self.request_interactive_auth().await?;
            // Consent given: the browser flow is in flight, but this
            // action still cannot run yet.
            return Err(AppError::AuthRequired);
        }
        Ok(())
    }

    pub async fn toggle_playback(&self) -> AppResult<()> {
        self.require_token().await?;
        if self.is_playing.load(Ordering::SeqCst) {
            self.client.pause().await?;
            self.is_playing.store(false, Ordering::SeqCst);
        } else {
            self.client.play().await?;
            self.is_playing.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    pub async fn next_track(&self) -> AppResult<()> {
        self.require_token().await?;
        self.client.next_track().await
    }

    pub async fn previous_track(&self) -> AppResult<()> {
        self.require_token().await?;
        self.client.previous_track().await
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.access_token.clone()
    }

    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await == SessionState::Authenticated
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthSuccessPayload> {
        self.auth_events.subscribe()
    }

    pub fn client(&self) -> &Arc<SpotifyClient> {
        &self.client
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
