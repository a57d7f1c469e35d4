use std::{
    collections::{BTreeMap, HashMap},
    time::Instant,
};

use indicatif::ProgressBar;
use rand::Rng;

use super::{
    evaluate::{Evaluator, Rejection, Verdict},
    settings::GeneratorSettings,
    source::{CandidateSource, primary_artist_ids},
    state::GeneratorState,
    tier::TierSpec,
};
use crate::{debug, warning};

/// How a tier run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Both buckets reached their quota exactly.
    Filled(Vec<String>),
    /// The search budget ran out first.
    PartiallyFilled {
        tracks: Vec<String>,
        target_count: usize,
        other_count: usize,
    },
    /// The wall-clock budget ran out first.
    TimedOut {
        tracks: Vec<String>,
        target_count: usize,
        other_count: usize,
    },
}

impl Outcome {
    pub fn tracks(&self) -> &[String] {
        match self {
            Outcome::Filled(tracks) => tracks,
            Outcome::PartiallyFilled { tracks, .. } | Outcome::TimedOut { tracks, .. } => tracks,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Outcome::Filled(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Filled(_) => "filled",
            Outcome::PartiallyFilled { .. } => "partially filled",
            Outcome::TimedOut { .. } => "timed out",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub searches: u32,
    pub empty_batches: u32,
    pub failed_calls: u32,
    pub candidates: usize,
    pub accepted: usize,
    pub rejections: BTreeMap<Rejection, usize>,
}

impl RunStats {
    pub fn rejected(&self) -> usize {
        self.rejections.values().sum()
    }
}

#[derive(Debug, Clone)]
pub struct TierRun {
    pub outcome: Outcome,
    pub stats: RunStats,
}

enum Stop {
    Filled,
    Exhausted,
    TimedOut,
}

/// The rejection-sampling loop that fills one tier.
///
/// Each iteration draws a seed for whichever bucket still needs tracks,
/// fetches a batch and its artist metadata, and runs every candidate through
/// the [`Evaluator`] until both buckets are full or a budget runs out.
pub struct QuotaGenerator<'a, S: CandidateSource + ?Sized, R: Rng> {
    source: &'a S,
    settings: &'a GeneratorSettings,
    rng: R,
    progress: ProgressBar,
}

impl<'a, S: CandidateSource + ?Sized, R: Rng> QuotaGenerator<'a, S, R> {
    pub fn new(source: &'a S, settings: &'a GeneratorSettings, rng: R) -> Self {
        Self {
            source,
            settings,
            rng,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub async fn generate(&mut self, tier: &TierSpec) -> TierRun {
        let evaluator = Evaluator::new(self.settings, tier);
        let quota = evaluator.quota();
        let market = evaluator.policy().market.clone();
        let mainstream = evaluator.policy().mainstream;

        let mut state = GeneratorState::new();
        let mut stats = RunStats::default();
        let started = Instant::now();

        let stop = loop {
            if state.is_filled(&quota) {
                break Stop::Filled;
            }
            if self
                .settings
                .max_duration
                .is_some_and(|max| started.elapsed() >= max)
            {
                break Stop::TimedOut;
            }
            if self
                .settings
                .max_searches
                .is_some_and(|max| stats.searches >= max)
            {
                break Stop::Exhausted;
            }

            let need_target = !state.target_full(&quota);
            let Some(seed) = self
                .settings
                .seeds
                .pick_seed(&mut self.rng, need_target, mainstream)
                .map(str::to_string)
            else {
                break Stop::Exhausted;
            };

            stats.searches += 1;
            let batch = match self.source.search(&seed, &market).await {
                Ok(batch) => batch,
                Err(e) => {
                    warning!("Search for '{}' failed: {}", seed, e);
                    stats.failed_calls += 1;
                    continue;
                }
            };

            if batch.is_empty() {
                stats.empty_batches += 1;
                continue;
            }

            let ids = primary_artist_ids(&batch);
            let artists = if ids.is_empty() {
                HashMap::new()
            } else {
                match self.source.artists(&ids).await {
                    Ok(artists) => artists,
                    Err(e) => {
                        // judging the batch against placeholder artists would let
                        // unbounded tiers accept anything, so drop it instead
                        warning!("Artist lookup for seed '{}' failed: {}", seed, e);
                        stats.failed_calls += 1;
                        continue;
                    }
                }
            };

            for track in &batch {
                if state.is_filled(&quota) {
                    break;
                }

                stats.candidates += 1;
                match evaluator.evaluate(track, &artists, &state) {
                    Verdict::Accept(acceptance) => {
                        debug!("[{}] accepted '{}'", tier.name, track.name);
                        state.commit(acceptance);
                        stats.accepted += 1;
                    }
                    Verdict::Reject(reason) => {
                        *stats.rejections.entry(reason).or_insert(0) += 1;
                    }
                }
            }

            self.progress.set_message(format!(
                "{tier}: {target}/{target_quota} {language}, {other}/{other_quota} other ({searches} searches)",
                tier = tier.name,
                target = state.target_len(),
                target_quota = quota.target,
                language = self.settings.language.name,
                other = state.other_len(),
                other_quota = quota.other,
                searches = stats.searches,
            ));
        };

        let target_count = state.target_len();
        let other_count = state.other_len();
        let tracks = state.into_shuffled(&mut self.rng);

        let outcome = match stop {
            Stop::Filled => Outcome::Filled(tracks),
            Stop::Exhausted => Outcome::PartiallyFilled {
                tracks,
                target_count,
                other_count,
            },
            Stop::TimedOut => Outcome::TimedOut {
                tracks,
                target_count,
                other_count,
            },
        };

        TierRun { outcome, stats }
    }
}
