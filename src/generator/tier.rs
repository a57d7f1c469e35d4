use serde::{Deserialize, Serialize};

use super::settings::GeneratorSettings;

/// One playlist target, defined by a band of artist follower counts.
///
/// Both bounds are inclusive; an absent bound (or a `min` of 0) leaves that
/// side open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    pub name: String,
    #[serde(default)]
    pub min: Option<u64>,
    #[serde(default)]
    pub max: Option<u64>,
}

/// Per-tier switches derived from the lower follower bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPolicy {
    pub mainstream: bool,
    pub popularity_floor: Option<u32>,
    pub market: String,
}

impl TierSpec {
    pub fn new(name: &str, min: Option<u64>, max: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
        }
    }

    fn lower(&self) -> u64 {
        self.min.unwrap_or(0)
    }

    /// Follower check with unknown counts treated as unconstrained: they
    /// clear any lower bound and fail any finite upper bound.
    pub fn admits_followers(&self, followers: Option<u64>) -> bool {
        match followers {
            Some(count) => count >= self.lower() && self.max.is_none_or(|max| count <= max),
            None => self.max.is_none(),
        }
    }

    pub fn policy(&self, settings: &GeneratorSettings) -> TierPolicy {
        let lower = self.lower();
        let mainstream = lower >= settings.mainstream_threshold;

        let popularity_floor = if lower >= settings.star_threshold {
            Some(settings.star_popularity_floor)
        } else if mainstream {
            Some(settings.popularity_floor)
        } else {
            None
        };

        let market = if mainstream {
            settings.mainstream_market.clone()
        } else {
            settings.market.clone()
        };

        TierPolicy {
            mainstream,
            popularity_floor,
            market,
        }
    }

    /// Follower clause such as `">200 and <1000"`, or `"any"` when unbounded.
    pub fn follower_band(&self) -> String {
        let lower = self.min.filter(|&m| m > 0).map(|m| format!(">{m}"));
        let upper = self.max.map(|m| format!("<{m}"));

        match (lower, upper) {
            (Some(l), Some(u)) => format!("{l} and {u}"),
            (Some(l), None) => l,
            (None, Some(u)) => u,
            (None, None) => "any".to_string(),
        }
    }

    /// Playlist description without the leading timestamp clause.
    pub fn summary(&self, settings: &GeneratorSettings) -> String {
        format!(
            "Followers: {band}. {language} % = {percent}%. Max {cap} songs/artist.",
            band = self.follower_band(),
            language = settings.language.name,
            percent = settings.target_percent(),
            cap = settings.artist_cap,
        )
    }

    pub fn describe(&self, settings: &GeneratorSettings, timestamp: &str) -> String {
        format!(
            "Auto-updated at {timestamp}. {summary}",
            summary = self.summary(settings)
        )
    }
}

/// The five audience tiers, from unknown to known artists.
pub fn default_tiers() -> Vec<TierSpec> {
    vec![
        TierSpec::new("Random Songs A (unknown artists)", Some(0), Some(200)),
        TierSpec::new("Random Songs B (tiny artists)", Some(200), Some(1_000)),
        TierSpec::new("Random Songs C (small artists)", Some(1_000), Some(10_000)),
        TierSpec::new("Random Songs D (medium artists)", Some(10_000), Some(50_000)),
        TierSpec::new("Random Songs E (known artists)", Some(50_000), None),
    ]
}
