use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{config, spotify, types::Token, warning};

/// Holds the current OAuth token and refreshes it shortly before expiry.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Builds a manager around a bare refresh token. The access token is
    /// marked as expired so the first request refreshes it.
    pub fn from_refresh_token(refresh_token: String) -> Self {
        TokenManager {
            token: Token {
                access_token: String::new(),
                refresh_token,
                scope: String::new(),
                expires_in: 0,
                obtained_at: 0,
            },
        }
    }

    /// Prefers `SPOTIFY_REFRESH_TOKEN` from the environment, otherwise the
    /// token cached by `sporlmix auth`.
    pub async fn resolve() -> Result<Self, String> {
        match config::spotify_refresh_token() {
            Some(refresh) => Ok(Self::from_refresh_token(refresh)),
            None => Self::load().await,
        }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        self.persist_to(&Self::token_path()).await
    }

    async fn persist_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("{}: {}", parent.display(), e))?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Returns a usable access token, refreshing it first when needed.
    ///
    /// A failed refresh is returned as an error; at startup this is how an
    /// invalid long-lived credential surfaces.
    pub async fn get_valid_token(&mut self) -> Result<String, String> {
        if self.is_expired() {
            let refreshed = spotify::auth::refresh_token(&self.token.refresh_token).await?;
            self.token = refreshed;
            if config::spotify_refresh_token().is_none() {
                if let Err(e) = self.persist().await {
                    warning!("Refreshed token was not saved to cache: {}", e);
                }
            }
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        self.token.access_token.is_empty()
            || now + 240 >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: String::new(),
            expires_in: 3600,
            obtained_at: 0,
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sporlmix-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_persist_writes_token_json() {
        let dir = scratch_dir("persist-ok");
        let path = dir.join("cache/token.json");

        TokenManager::new(token()).persist_to(&path).await.unwrap();

        let saved: Token =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.refresh_token, "refresh");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_persist_reports_unwritable_cache() {
        let dir = scratch_dir("persist-err");
        // a regular file where the cache directory should be
        let blocker = dir.join("cache");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = TokenManager::new(token())
            .persist_to(&blocker.join("token.json"))
            .await
            .unwrap_err();

        assert!(err.contains("cache"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
