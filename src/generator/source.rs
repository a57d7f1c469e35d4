use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    Res,
    types::{Artist, Track},
};

/// Largest batch the catalog hands out per search or artist lookup.
pub const BATCH_LIMIT: usize = 50;

/// Where candidate tracks come from.
///
/// The generator treats this as an oracle with no coverage or determinism
/// guarantees: repeated searches for the same seed may return different
/// tracks, and an empty batch is a valid answer.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// At most [`BATCH_LIMIT`] tracks matching `seed` in `market`.
    async fn search(&self, seed: &str, market: &str) -> Res<Vec<Track>>;

    /// Metadata for up to [`BATCH_LIMIT`] distinct artist ids. Ids the
    /// catalog does not know are simply absent from the map.
    async fn artists(&self, ids: &[String]) -> Res<HashMap<String, Artist>>;
}

/// Distinct, non-empty primary-artist ids of a batch, in first-seen order,
/// capped at [`BATCH_LIMIT`].
pub fn primary_artist_ids(batch: &[Track]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in batch
        .iter()
        .filter_map(|t| t.primary_artist().and_then(|a| a.id.as_ref()))
        .filter(|id| !id.is_empty())
    {
        if ids.len() == BATCH_LIMIT {
            break;
        }
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}
