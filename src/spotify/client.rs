use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use super::pacer::RequestPacer;
use crate::{
    Res, config, debug,
    management::{ArtistCache, TokenManager},
    warning,
};

const MAX_ATTEMPTS: u32 = 4;
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Authenticated, paced access to the Spotify Web API.
///
/// One client serves the whole run: the token manager, the pacer and the
/// artist cache are shared by every tier, sequential or concurrent.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    pacer: Arc<RequestPacer>,
    pub(crate) artist_cache: ArtistCache,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager, pacer: Arc<RequestPacer>) -> Self {
        Self {
            http: Client::new(),
            api_url: config::spotify_apiurl().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
            pacer,
            artist_cache: ArtistCache::new(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Fetches a valid access token, refreshing it if needed.
    pub async fn access_token(&self) -> Result<String, String> {
        self.tokens.lock().await.get_valid_token().await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Res<T> {
        let response = self.send(method, url, Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends a request that answers with no body worth reading.
    pub(crate) async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Res<()> {
        self.send(method, url, Some(body)).await?;
        Ok(())
    }

    /// Paced request with bearer auth.
    ///
    /// `502 Bad Gateway` is retried after 10 seconds. `429 Too Many Requests`
    /// waits for `Retry-After` when it is at most two minutes; longer waits
    /// are reported as errors.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Res<Response> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.pacer.wait().await;
            let token = self.access_token().await?;

            let mut request = self
                .http
                .request(method.clone(), url)
                .bearer_auth(token);
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!("{} {}", method, url);
            let response = request.send().await?;

            match response.status() {
                StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                    sleep(Duration::from_secs(10)).await;
                    continue;
                }
                StatusCode::TOO_MANY_REQUESTS if attempt < MAX_ATTEMPTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);

                    if retry_after > MAX_RETRY_AFTER_SECS {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds. Try again later.",
                            retry_after
                        );
                        return Err(format!("rate limited for {retry_after} seconds").into());
                    }

                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                _ => return Ok(response.error_for_status()?),
            }
        }
    }
}
