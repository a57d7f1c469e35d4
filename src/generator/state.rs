use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::SliceRandom};

/// The two bucket sizes and two caps a single tier run must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub target: usize,
    pub other: usize,
    pub per_artist: usize,
    pub regional: usize,
}

/// Everything the evaluator decided to keep, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    pub track_id: String,
    pub artist_id: String,
    pub title_key: String,
    pub target_language: bool,
    pub regional: bool,
}

/// Mutable bookkeeping of one tier run. Never shared between tiers.
#[derive(Debug, Default)]
pub struct GeneratorState {
    target: Vec<String>,
    other: Vec<String>,
    artist_counts: HashMap<String, usize>,
    accepted: HashSet<String>,
    title_keys: HashSet<(String, String)>,
    regional: usize,
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, acceptance: Acceptance) {
        let Acceptance {
            track_id,
            artist_id,
            title_key,
            target_language,
            regional,
        } = acceptance;

        self.accepted.insert(track_id.clone());
        self.title_keys.insert((artist_id.clone(), title_key));
        *self.artist_counts.entry(artist_id).or_insert(0) += 1;
        if regional {
            self.regional += 1;
        }

        if target_language {
            self.target.push(track_id);
        } else {
            self.other.push(track_id);
        }
    }

    pub fn is_accepted(&self, track_id: &str) -> bool {
        self.accepted.contains(track_id)
    }

    pub fn artist_count(&self, artist_id: &str) -> usize {
        self.artist_counts.get(artist_id).copied().unwrap_or(0)
    }

    pub fn has_title(&self, artist_id: &str, title_key: &str) -> bool {
        self.title_keys
            .contains(&(artist_id.to_string(), title_key.to_string()))
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn other_len(&self) -> usize {
        self.other.len()
    }

    pub fn regional_count(&self) -> usize {
        self.regional
    }

    pub fn target_full(&self, quota: &Quota) -> bool {
        self.target.len() >= quota.target
    }

    pub fn other_full(&self, quota: &Quota) -> bool {
        self.other.len() >= quota.other
    }

    pub fn is_filled(&self, quota: &Quota) -> bool {
        self.target_full(quota) && self.other_full(quota)
    }

    /// Target bucket followed by the rest, then shuffled so the playlist is
    /// not clustered by language.
    pub fn into_shuffled<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<String> {
        let mut tracks = self.target;
        tracks.extend(self.other);
        tracks.shuffle(rng);
        tracks
    }
}
