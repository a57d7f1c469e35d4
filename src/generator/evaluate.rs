//! Accept/reject decision for a single candidate track.
//!
//! Filters run in a fixed order and the first failing one is reported. Cheap
//! local checks come first, then the bucket quotas, and only then the checks
//! that need artist metadata.

use std::{collections::HashMap, fmt};

use super::{
    classify::normalize_title,
    settings::GeneratorSettings,
    state::{Acceptance, GeneratorState, Quota},
    tier::{TierPolicy, TierSpec},
};
use crate::types::{Artist, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    MissingTrackId,
    Duplicate,
    BlankTitle,
    UndesirableVariant,
    MissingArtist,
    ArtistCapReached,
    DuplicateTitle,
    TargetBucketFull,
    OtherBucketFull,
    FollowersOutOfBand,
    BelowPopularityFloor,
    RegionalCapReached,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::MissingTrackId => "missing track id",
            Rejection::Duplicate => "already accepted",
            Rejection::BlankTitle => "blank title",
            Rejection::UndesirableVariant => "live/remix/karaoke version",
            Rejection::MissingArtist => "missing primary artist",
            Rejection::ArtistCapReached => "artist cap reached",
            Rejection::DuplicateTitle => "same title by same artist",
            Rejection::TargetBucketFull => "target-language bucket full",
            Rejection::OtherBucketFull => "other bucket full",
            Rejection::FollowersOutOfBand => "followers out of band",
            Rejection::BelowPopularityFloor => "below popularity floor",
            Rejection::RegionalCapReached => "regional cap reached",
        };
        write!(f, "{reason}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept(Acceptance),
    Reject(Rejection),
}

/// Filter chain bound to one tier.
pub struct Evaluator<'a> {
    settings: &'a GeneratorSettings,
    tier: &'a TierSpec,
    policy: TierPolicy,
    quota: Quota,
}

impl<'a> Evaluator<'a> {
    pub fn new(settings: &'a GeneratorSettings, tier: &'a TierSpec) -> Self {
        let quota = Quota {
            target: settings.target_quota(),
            other: settings.other_quota(),
            per_artist: settings.artist_cap,
            regional: settings.regional_cap(),
        };

        Self {
            settings,
            tier,
            policy: tier.policy(settings),
            quota,
        }
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Decides on `track` without touching `state`; an acceptance has to be
    /// committed by the caller.
    ///
    /// `artists` is the enrichment map of the current batch. A primary artist
    /// missing from it is judged as an artist with unknown followers and no
    /// genres.
    pub fn evaluate(
        &self,
        track: &Track,
        artists: &HashMap<String, Artist>,
        state: &GeneratorState,
    ) -> Verdict {
        let Some(track_id) = track.id.as_deref().filter(|id| !id.is_empty()) else {
            return Verdict::Reject(Rejection::MissingTrackId);
        };
        if state.is_accepted(track_id) {
            return Verdict::Reject(Rejection::Duplicate);
        }

        if track.name.trim().is_empty() {
            return Verdict::Reject(Rejection::BlankTitle);
        }
        if self.settings.filters.is_undesirable(&track.name) {
            return Verdict::Reject(Rejection::UndesirableVariant);
        }

        let Some(primary) = track.primary_artist() else {
            return Verdict::Reject(Rejection::MissingArtist);
        };
        let Some(artist_id) = primary.id.as_deref().filter(|id| !id.is_empty()) else {
            return Verdict::Reject(Rejection::MissingArtist);
        };

        if state.artist_count(artist_id) >= self.quota.per_artist {
            return Verdict::Reject(Rejection::ArtistCapReached);
        }

        let title_key = normalize_title(&track.name);
        if state.has_title(artist_id, &title_key) {
            return Verdict::Reject(Rejection::DuplicateTitle);
        }

        let target_language = self.settings.language.is_target_language(track);
        if target_language && state.target_full(&self.quota) {
            return Verdict::Reject(Rejection::TargetBucketFull);
        }
        if !target_language && state.other_full(&self.quota) {
            return Verdict::Reject(Rejection::OtherBucketFull);
        }

        let unknown;
        let artist = match artists.get(artist_id) {
            Some(artist) => artist,
            None => {
                unknown = Artist::unknown(artist_id, &primary.name);
                &unknown
            }
        };

        if !self.tier.admits_followers(artist.followers) {
            return Verdict::Reject(Rejection::FollowersOutOfBand);
        }

        if let Some(floor) = self.policy.popularity_floor {
            if track.popularity < floor {
                return Verdict::Reject(Rejection::BelowPopularityFloor);
            }
        }

        let regional = self.settings.regional.is_regional(track, artist);
        if regional && state.regional_count() >= self.quota.regional {
            return Verdict::Reject(Rejection::RegionalCapReached);
        }

        Verdict::Accept(Acceptance {
            track_id: track_id.to_string(),
            artist_id: artist_id.to_string(),
            title_key,
            target_language,
            regional,
        })
    }
}
