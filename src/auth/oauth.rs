use crate::api::models::TokenResponse;
use crate::error::{AppError, AppResult};

/// Build the provider authorization URL for the S256 PKCE flow.
pub fn build_authorize_url(
    authorize_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    code_challenge: &str,
) -> String {
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&code_challenge_method=S256&code_challenge={}",
        authorize_url,
        client_id,
        urlencoding::encode(redirect_uri),
        urlencoding::encode(scope),
        code_challenge
    )
}

/// Exchange an authorization code for tokens. PKCE flow: only client_id,
/// code, redirect_uri and code_verifier are sent, no client secret.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    redirect_uri: &str,
    code: &str,
    code_verifier: &str,
) -> AppResult<TokenResponse> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", client_id),
        ("code_verifier", code_verifier),
    ];

    let response = http.post(token_url).form(&params).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::SpotifyApi {
            status: status.as_u16(),
            message: format!("Token exchange failed: {}", body),
        });
    }

    let token: TokenResponse = response.json().await?;
    Ok(token)
}

/// Obtain a fresh access token using the refresh_token grant. The response
/// may omit `refresh_token`; the caller keeps the previous one then.
pub async fn exchange_refresh(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    refresh_token: &str,
) -> AppResult<TokenResponse> {
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client_id),
    ];

    let response = http.post(token_url).form(&params).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::SpotifyApi {
            status: status.as_u16(),
            message: format!("Token refresh failed: {}", body),
        });
    }

    let token: TokenResponse = response.json().await?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn authorize_url_carries_the_pkce_parameters() {
        let url = build_authorize_url(
            "https://accounts.spotify.com/authorize",
            "client-1",
            "http://localhost:8888/callback",
            "user-read-playback-state",
            "chal123",
        );
        assert!(url.starts_with("https://accounts.spotify.com/authorize?response_type=code"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fcallback"));
        assert!(url.contains("scope=user-read-playback-state"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("code_challenge=chal123"));
    }

    #[tokio::test]
    async fn exchange_code_posts_the_form_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc123"))
            .and(body_string_contains("code_verifier=ver-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-1",
                "refresh_token": "rt-1",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let token = exchange_code(
            &http,
            &format!("{}/api/token", server.uri()),
            "client-1",
            "http://localhost:8888/callback",
            "abc123",
            "ver-1",
        )
        .await
        .unwrap();

        assert_eq!(token.access_token, "at-1");
        assert_eq!(token.refresh_token.as_deref(), Some("rt-1"));
    }

    #[tokio::test]
    async fn mismatched_verifier_surfaces_the_provider_error() {
        let server = MockServer::start().await;
        // Provider accepts only the live verifier; a stale one gets the
        // standard invalid_grant rejection.
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("code_verifier=stale-verifier"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let err = exchange_code(
            &http,
            &format!("{}/api/token", server.uri()),
            "client-1",
            "http://localhost:8888/callback",
            "abc123",
            "stale-verifier",
        )
        .await
        .unwrap_err();

        match err {
            AppError::SpotifyApi { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("invalid_grant"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn exchange_refresh_posts_the_refresh_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-new"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let token = exchange_refresh(
            &http,
            &format!("{}/api/token", server.uri()),
            "client-1",
            "rt-old",
        )
        .await
        .unwrap();

        assert_eq!(token.access_token, "at-new");
        // Response omitted refresh_token; callers must keep the old one.
        assert_eq!(token.refresh_token, None);
    }
}
