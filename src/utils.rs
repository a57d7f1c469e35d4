use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local, TimeZone};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::generator::{Outcome, TierPolicy, TierSpec};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Timestamp used in playlist descriptions, e.g. `2025-01-31 08:00:00`.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Blue braille spinner with a message, ticking every 100ms.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Short human label for a tier's derived policy, e.g. `mainstream, pop >= 55`.
pub fn describe_policy(policy: &TierPolicy) -> (String, String) {
    let mode = if policy.mainstream {
        "mainstream"
    } else {
        "obscure"
    };
    let floor = policy
        .popularity_floor
        .map(|f| format!(">= {f}"))
        .unwrap_or_else(|| "-".to_string());
    (mode.to_string(), floor)
}

/// `"15+35 of 50"` style fill summary for an outcome.
pub fn outcome_fill(outcome: &Outcome, track_count: usize) -> String {
    match outcome {
        Outcome::Filled(tracks) => format!("{} of {}", tracks.len(), track_count),
        Outcome::PartiallyFilled {
            target_count,
            other_count,
            ..
        }
        | Outcome::TimedOut {
            target_count,
            other_count,
            ..
        } => format!("{target_count}+{other_count} of {track_count}"),
    }
}

/// Tiers whose name contains any of `filters` (case-insensitive); all tiers
/// when `filters` is empty.
pub fn select_tiers(tiers: Vec<TierSpec>, filters: &[String]) -> Vec<TierSpec> {
    if filters.is_empty() {
        return tiers;
    }

    let filters: Vec<String> = filters.iter().map(|f| f.to_lowercase()).collect();
    tiers
        .into_iter()
        .filter(|tier| {
            let name = tier.name.to_lowercase();
            filters.iter().any(|f| name.contains(f))
        })
        .collect()
}
