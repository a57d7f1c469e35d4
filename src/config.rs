//! Configuration management for the tiered playlist generator.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the local data directory (`<data_local_dir>/sporlmix/.env`)
//! 3. `.env` in the working directory
//! 4. Built-in defaults (where applicable)
//!
//! Anything wrong here is fatal: it is reported before any tier runs.

use std::{
    env, fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crate::generator::{GeneratorSettings, TierSpec, VariantFilters, default_tiers};

static VERBOSE: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    Invalid { key: String, value: String },
    Io(std::io::Error),
    Parse(serde_json::Error),
    Settings(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has invalid value '{value}'"),
            ConfigError::Io(e) => write!(f, "cannot read configuration: {e}"),
            ConfigError::Parse(e) => write!(f, "cannot parse tier table: {e}"),
            ConfigError::Settings(msg) => write!(f, "invalid generator settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Root of everything the tool keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlmix");
    path
}

/// Loads `.env` files from the local data directory and the working directory.
///
/// Missing files are fine; variables already present in the process
/// environment are never overwritten.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::Invalid {
            key: path.display().to_string(),
            value: e.to_string(),
        })?;
    }
    dotenv::dotenv().ok();

    if env_flag("SPORLMIX_VERBOSE", false)? {
        set_verbose(true);
    }
    Ok(())
}

pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

fn required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool, ConfigError> {
    match optional(key) {
        Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Returns the Spotify API client ID. Required for every command.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the client secret, if the app is registered as a confidential client.
pub fn spotify_client_secret() -> Option<String> {
    optional("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns a long-lived refresh token for headless runs (CI, cron).
pub fn spotify_refresh_token() -> Option<String> {
    optional("SPOTIFY_REFRESH_TOKEN")
}

/// Returns the address the OAuth callback server binds to.
pub fn server_addr() -> String {
    env_or("SERVER_ADDRESS", "127.0.0.1:8888")
}

pub fn spotify_redirect_uri() -> String {
    env_or("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8888/callback")
}

pub fn spotify_scope() -> String {
    env_or(
        "SPOTIFY_API_AUTH_SCOPE",
        "playlist-modify-private playlist-modify-public playlist-read-private",
    )
}

pub fn spotify_apiauth_url() -> String {
    env_or(
        "SPOTIFY_API_AUTH_URL",
        "https://accounts.spotify.com/authorize",
    )
}

pub fn spotify_apiurl() -> String {
    env_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

pub fn spotify_apitoken_url() -> String {
    env_or(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Minimum spacing between two Spotify calls, shared by all tiers.
pub fn request_delay() -> Result<Duration, ConfigError> {
    env_parse("SPORLMIX_REQUEST_DELAY_MS", 120u64).map(Duration::from_millis)
}

/// Reads every generator option, falling back to the defaults, and validates
/// the result.
pub fn generator_settings() -> Result<GeneratorSettings, ConfigError> {
    let defaults = GeneratorSettings::default();

    let max_searches: u32 = env_parse("SPORLMIX_MAX_SEARCHES", 2000)?;
    let max_seconds: u64 = env_parse("SPORLMIX_MAX_TIER_SECONDS", 900)?;

    let settings = GeneratorSettings {
        track_count: env_parse("SPORLMIX_TRACK_COUNT", defaults.track_count)?,
        target_fraction: env_parse("SPORLMIX_TARGET_FRACTION", defaults.target_fraction)?,
        artist_cap: env_parse("SPORLMIX_ARTIST_CAP", defaults.artist_cap)?,
        regional_fraction: env_parse("SPORLMIX_REGIONAL_FRACTION", defaults.regional_fraction)?,
        mainstream_threshold: env_parse(
            "SPORLMIX_MAINSTREAM_THRESHOLD",
            defaults.mainstream_threshold,
        )?,
        star_threshold: env_parse("SPORLMIX_STAR_THRESHOLD", defaults.star_threshold)?,
        popularity_floor: env_parse("SPORLMIX_POPULARITY_FLOOR", defaults.popularity_floor)?,
        star_popularity_floor: env_parse(
            "SPORLMIX_STAR_POPULARITY_FLOOR",
            defaults.star_popularity_floor,
        )?,
        filters: VariantFilters {
            live: env_flag("SPORLMIX_FILTER_LIVE", true)?,
            remix: env_flag("SPORLMIX_FILTER_REMIX", true)?,
            karaoke: env_flag("SPORLMIX_FILTER_KARAOKE", true)?,
        },
        market: env_or("SPORLMIX_MARKET", &defaults.market),
        mainstream_market: env_or("SPORLMIX_MAINSTREAM_MARKET", &defaults.mainstream_market),
        max_searches: (max_searches > 0).then_some(max_searches),
        max_duration: (max_seconds > 0).then(|| Duration::from_secs(max_seconds)),
        ..defaults
    };

    settings.validate().map_err(ConfigError::Settings)?;
    Ok(settings)
}

/// Loads the ordered tier table from `path`, `SPORLMIX_TIERS_FILE`, or the
/// built-in defaults.
pub async fn load_tiers(path: Option<&Path>) -> Result<Vec<TierSpec>, ConfigError> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => optional("SPORLMIX_TIERS_FILE").map(PathBuf::from),
    };

    let Some(path) = path else {
        return Ok(default_tiers());
    };

    let content = async_fs::read_to_string(&path).await?;
    parse_tiers(&content)
}

pub fn parse_tiers(content: &str) -> Result<Vec<TierSpec>, ConfigError> {
    let tiers: Vec<TierSpec> = serde_json::from_str(content)?;
    if tiers.is_empty() {
        return Err(ConfigError::Settings("tier table is empty".to_string()));
    }
    for tier in &tiers {
        if let (Some(min), Some(max)) = (tier.min, tier.max) {
            if min > max {
                return Err(ConfigError::Settings(format!(
                    "tier '{}' has min {} above max {}",
                    tier.name, min, max
                )));
            }
        }
    }
    Ok(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_variants() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_parse_tiers_keeps_order_and_open_bounds() {
        let tiers = parse_tiers(
            r#"[
                {"name": "Tiny", "min": 0, "max": 200},
                {"name": "Known", "min": 50000},
                {"name": "Anything"}
            ]"#,
        )
        .unwrap();

        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].name, "Tiny");
        assert_eq!(tiers[1].max, None);
        assert_eq!(tiers[2].min, None);
    }

    #[test]
    fn test_parse_tiers_rejects_inverted_band() {
        let err = parse_tiers(r#"[{"name": "Broken", "min": 500, "max": 10}]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn test_parse_tiers_rejects_empty_table() {
        assert!(parse_tiers("[]").is_err());
    }
}
