use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::types::Artist;

/// In-memory artist metadata shared by all tiers of one run.
///
/// Lower tiers and higher tiers often meet the same artists; remembering them
/// saves a lookup per batch. Nothing is written to disk.
#[derive(Default)]
pub struct ArtistCache {
    artists: RwLock<HashMap<String, Artist>>,
}

impl ArtistCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `ids` into the cached artists and the ids still to fetch.
    pub async fn partition(&self, ids: &[String]) -> (HashMap<String, Artist>, Vec<String>) {
        let artists = self.artists.read().await;
        let mut found = HashMap::new();
        let mut missing = Vec::new();

        for id in ids {
            match artists.get(id) {
                Some(artist) => {
                    found.insert(id.clone(), artist.clone());
                }
                None => missing.push(id.clone()),
            }
        }

        (found, missing)
    }

    pub async fn add_artists(&self, fetched: impl IntoIterator<Item = Artist>) {
        let mut artists = self.artists.write().await;
        for artist in fetched {
            artists.insert(artist.id.clone(), artist);
        }
    }

    pub async fn count(&self) -> usize {
        self.artists.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: &str, followers: u64) -> Artist {
        Artist {
            id: id.to_string(),
            name: format!("Artist {id}"),
            followers: Some(followers),
            genres: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_partition_splits_known_and_missing() {
        let cache = ArtistCache::new();
        cache.add_artists(vec![artist("a", 10), artist("b", 20)]).await;

        let ids = vec!["a".to_string(), "c".to_string(), "b".to_string()];
        let (found, missing) = cache.partition(&ids).await;

        assert_eq!(found.len(), 2);
        assert_eq!(found["b"].followers, Some(20));
        assert_eq!(missing, vec!["c".to_string()]);
        assert_eq!(cache.count().await, 2);
    }
}
