use crate::error::{AppError, AppResult};
use crate::session::{AuthorizationGrant, Session};
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Served after a completed exchange and for scheme bounce-back renders.
/// Client-side redirects into the custom scheme (no sensitive data in the
/// URL, tokens were already obtained server-side) and closes itself.
const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Authorization complete</title>
</head>
<body>
  <h1>Authorization complete. This window will close in 3 seconds.</h1>
  <script>
    window.location.href = 'myapp://auth-success';
    setTimeout(function () { window.close(); }, 3000);
  </script>
</body>
</html>
"#;

pub fn router(session: Arc<Session>) -> Router {
    Router::new()
        .route("/callback", get(handle_callback))
        .with_state(session)
}

/// Bind the loopback listener on its fixed port. Failure disables the
/// interactive flow only; callers keep the rest of the app running.
pub async fn bind(port: u16) -> AppResult<TcpListener> {
    TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| AppError::ListenerBind(format!("port {}: {}", port, e)))
}

pub async fn serve(listener: TcpListener, session: Arc<Session>) -> AppResult<()> {
    log::info!("Callback listener on http://{}", listener.local_addr()?);
    axum::serve(listener, router(session)).await?;
    Ok(())
}

async fn handle_callback(
    State(session): State<Arc<Session>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match params.get("code") {
        Some(code) => {
            let grant = AuthorizationGrant::Code(code.clone());
            match session.complete_authorization(grant).await {
                Ok(()) => Html(SUCCESS_PAGE).into_response(),
                Err(e) => {
                    log::error!("Authorization code exchange failed: {}", e);
                    "Authorization failed. Please try again.".into_response()
                }
            }
        }
        // No code: either the scheme-redirect bounce-back render or a
        // direct navigation. Serve the auto-closing page either way.
        None => Html(SUCCESS_PAGE).into_response(),
    }
}
