use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The persisted token record. Field names match the original on-disk
/// format (`accessToken` / `refreshToken`).
///
/// Tokens are stored in plaintext; the store offers durability, not
/// secrecy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Durable read/write of the token record. No validation logic lives here.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// A missing file is a normal first-run condition, not an error.
    pub fn load(&self) -> AppResult<Option<TokenPair>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let tokens: TokenPair = serde_json::from_str(&content)?;
        Ok(Some(tokens))
    }

    /// Overwrites the whole record. Writes to a temp file and renames so a
    /// crash mid-write cannot truncate a previously valid store.
    pub fn save(&self, tokens: &TokenPair) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(tokens)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().join("tokens.json"))
    }

    #[test]
    fn load_on_fresh_store_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let tokens = TokenPair {
            access_token: Some("access-abc".into()),
            refresh_token: Some("refresh-xyz".into()),
        };
        store.save(&tokens).unwrap();

        assert_eq!(store.load().unwrap(), Some(tokens));
    }

    #[test]
    fn save_overwrites_the_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&TokenPair {
                access_token: Some("old-access".into()),
                refresh_token: Some("old-refresh".into()),
            })
            .unwrap();
        store
            .save(&TokenPair {
                access_token: Some("new-access".into()),
                refresh_token: None,
            })
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("new-access"));
        assert_eq!(loaded.refresh_token, None);
    }

    #[test]
    fn on_disk_format_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&TokenPair {
                access_token: Some("a".into()),
                refresh_token: Some("r".into()),
            })
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("tokens.json")).unwrap();
        assert!(raw.contains("accessToken"));
        assert!(raw.contains("refreshToken"));
    }
}
