use std::sync::Arc;

use crate::{
    config, error, info,
    management::TokenManager,
    spotify::{RequestPacer, SpotifyClient},
    success,
};

/// Refreshes the access token and fetches the current user, exiting with an
/// error when either step fails.
pub async fn check() {
    let tokens = match TokenManager::resolve().await {
        Ok(tokens) => tokens,
        Err(e) => error!(
            "Failed to load token. Run sporlmix auth or set SPOTIFY_REFRESH_TOKEN.\n Error: {}",
            e
        ),
    };

    let delay = match config::request_delay() {
        Ok(delay) => delay,
        Err(e) => error!("{}", e),
    };

    info!("Checking credentials against {}", config::spotify_apiurl());
    let client = SpotifyClient::new(tokens, Arc::new(RequestPacer::new(delay)));

    match client.current_user().await {
        Ok(user) => success!(
            "Authenticated as {} ({})",
            user.display_name.as_deref().unwrap_or("<no display name>"),
            user.id
        ),
        Err(e) => error!("Credential check failed: {}", e),
    }
}
