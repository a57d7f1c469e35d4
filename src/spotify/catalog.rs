use std::collections::HashMap;

use async_trait::async_trait;
use rand::Rng;

use super::client::SpotifyClient;
use crate::{
    Res,
    generator::{BATCH_LIMIT, CandidateSource},
    types::{Artist, SearchResponse, SeveralArtistsResponse, Track},
};

/// Highest random offset for a search; Spotify stops paging at 1000 results.
const MAX_SEARCH_OFFSET: u32 = 900;

#[async_trait]
impl CandidateSource for SpotifyClient {
    /// One page of track search results at a random offset, so repeated
    /// seeds keep surfacing different tracks.
    async fn search(&self, seed: &str, market: &str) -> Res<Vec<Track>> {
        let offset = rand::rng().random_range(0..=MAX_SEARCH_OFFSET);
        let mut url = reqwest::Url::parse(&self.url("search"))?;
        url.query_pairs_mut()
            .append_pair("q", seed)
            .append_pair("type", "track")
            .append_pair("limit", &BATCH_LIMIT.to_string())
            .append_pair("offset", &offset.to_string());
        if !market.is_empty() {
            url.query_pairs_mut().append_pair("market", market);
        }

        let response: SearchResponse = self.get(url.as_str()).await?;
        Ok(response.tracks.items.into_iter().flatten().collect())
    }

    /// Artist metadata, served from the run-wide cache where possible.
    async fn artists(&self, ids: &[String]) -> Res<HashMap<String, Artist>> {
        let (mut found, missing) = self.artist_cache.partition(ids).await;

        for chunk in missing.chunks(BATCH_LIMIT) {
            let url = format!("{}?ids={}", self.url("artists"), chunk.join(","));
            let response: SeveralArtistsResponse = self.get(&url).await?;

            let fetched: Vec<Artist> = response
                .artists
                .into_iter()
                .flatten()
                .map(Artist::from)
                .collect();
            self.artist_cache.add_artists(fetched.iter().cloned()).await;
            found.extend(fetched.into_iter().map(|a| (a.id.clone(), a)));
        }

        Ok(found)
    }
}
