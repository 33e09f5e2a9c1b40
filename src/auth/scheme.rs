use url::Url;

/// Custom URL scheme this app registers as the OS default handler for.
pub const SCHEME: &str = "myapp";
const AUTH_SUCCESS_HOST: &str = "auth-success";

/// Parse an OS scheme activation and extract the forwarded access token.
///
/// Only `myapp://auth-success?...` activations are honored; anything else
/// returns `None` so arbitrary scheme hits never mutate auth state. This
/// path never carries a refresh token; only the loopback code exchange
/// updates that.
pub fn parse_activation(raw: &str) -> Option<String> {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Ignoring malformed scheme activation: {}", e);
            return None;
        }
    };

    if parsed.scheme() != SCHEME || parsed.host_str() != Some(AUTH_SUCCESS_HOST) {
        log::debug!("Ignoring unrelated scheme activation: {}", raw);
        return None;
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
}
