use std::time::Duration;

use super::{
    classify::{LanguageProfile, RegionalProfile, VariantFilters},
    seeds::SeedPools,
};

/// Every tunable of a generation run.
///
/// Built from the environment by [`crate::config::generator_settings`]; tests
/// start from [`GeneratorSettings::default`] and override fields.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub track_count: usize,
    pub target_fraction: f64,
    pub artist_cap: usize,
    pub regional_fraction: f64,
    pub mainstream_threshold: u64,
    pub star_threshold: u64,
    pub popularity_floor: u32,
    pub star_popularity_floor: u32,
    pub filters: VariantFilters,
    pub language: LanguageProfile,
    pub regional: RegionalProfile,
    pub seeds: SeedPools,
    pub market: String,
    pub mainstream_market: String,
    /// Search calls allowed per tier, `None` for unbounded.
    pub max_searches: Option<u32>,
    /// Wall-clock budget per tier, `None` for unbounded.
    pub max_duration: Option<Duration>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        let language = LanguageProfile::default();
        let seeds = SeedPools::new(language.seeds.clone());

        Self {
            track_count: 50,
            target_fraction: 0.30,
            artist_cap: 3,
            regional_fraction: 0.06,
            mainstream_threshold: 50_000,
            star_threshold: 500_000,
            popularity_floor: 55,
            star_popularity_floor: 70,
            filters: VariantFilters::default(),
            language,
            regional: RegionalProfile::default(),
            seeds,
            market: "IL".to_string(),
            mainstream_market: "US".to_string(),
            max_searches: Some(2000),
            max_duration: Some(Duration::from_secs(900)),
        }
    }
}

impl GeneratorSettings {
    /// Number of target-language tracks per playlist.
    pub fn target_quota(&self) -> usize {
        ((self.track_count as f64 * self.target_fraction).round() as usize).min(self.track_count)
    }

    /// Number of remaining tracks per playlist.
    pub fn other_quota(&self) -> usize {
        self.track_count - self.target_quota()
    }

    /// Maximum number of regional-flagged tracks per playlist.
    pub fn regional_cap(&self) -> usize {
        // nudge before flooring so 50 * 0.06 lands on 3, not 2.9999
        (self.track_count as f64 * self.regional_fraction + 1e-9).floor() as usize
    }

    pub fn target_percent(&self) -> u32 {
        (self.target_fraction * 100.0).round() as u32
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.track_count == 0 {
            return Err("track count must be at least 1".to_string());
        }
        if self.artist_cap == 0 {
            return Err("per-artist cap must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.target_fraction) {
            return Err(format!(
                "target fraction {} is outside 0..=1",
                self.target_fraction
            ));
        }
        if !(0.0..=1.0).contains(&self.regional_fraction) {
            return Err(format!(
                "regional fraction {} is outside 0..=1",
                self.regional_fraction
            ));
        }
        if !self.seeds.is_complete() {
            return Err("every seed pool needs at least one entry".to_string());
        }
        Ok(())
    }
}
