use reqwest::Method;

use super::client::SpotifyClient;
use crate::{
    Res,
    types::{
        ChangePlaylistDetailsRequest, CreatePlaylistRequest, CurrentUser, GetUserPlaylistsResponse,
        Playlist, PlaylistItemsRequest, SnapshotResponse,
    },
};

/// Spotify accepts at most this many URIs per items request.
const ITEMS_PER_REQUEST: usize = 100;

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{id}")
}

impl SpotifyClient {
    pub async fn current_user(&self) -> Res<CurrentUser> {
        self.get(&self.url("me")).await
    }

    /// All playlists of the current user, following `next` links.
    pub async fn user_playlists(&self) -> Res<Vec<Playlist>> {
        let mut playlists = Vec::new();
        let mut next = Some(format!("{}?limit=50", self.url("me/playlists")));

        while let Some(url) = next {
            let page: GetUserPlaylistsResponse = self.get(&url).await?;
            playlists.extend(page.items.into_iter().flatten());
            next = page.next;
        }

        Ok(playlists)
    }

    /// Id of the user's playlist named `name` (case-insensitive), creating a
    /// private one when none exists.
    pub async fn find_or_create(&self, user_id: &str, name: &str) -> Res<String> {
        let wanted = name.to_lowercase();
        if let Some(existing) = self
            .user_playlists()
            .await?
            .into_iter()
            .find(|p| p.name.to_lowercase() == wanted)
        {
            return Ok(existing.id);
        }

        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: String::new(),
            public: false,
            collaborative: false,
        };
        let created: Playlist = self
            .send_json(
                Method::POST,
                &self.url(&format!("users/{user_id}/playlists")),
                &request,
            )
            .await?;

        Ok(created.id)
    }

    /// Makes the playlist contain exactly `track_ids`, in order.
    ///
    /// The first 100 replace the current items (an empty list clears the
    /// playlist); the rest are appended in chunks.
    pub async fn replace_items(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        let uris: Vec<String> = track_ids.iter().map(|id| track_uri(id)).collect();
        let url = self.url(&format!("playlists/{playlist_id}/tracks"));

        let split = uris.len().min(ITEMS_PER_REQUEST);
        let (first, rest) = uris.split_at(split);

        let _: SnapshotResponse = self
            .send_json(
                Method::PUT,
                &url,
                &PlaylistItemsRequest {
                    uris: first.to_vec(),
                },
            )
            .await?;

        for chunk in rest.chunks(ITEMS_PER_REQUEST) {
            self.add_items(playlist_id, chunk).await?;
        }

        Ok(())
    }

    pub async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let _: SnapshotResponse = self
            .send_json(
                Method::POST,
                &self.url(&format!("playlists/{playlist_id}/tracks")),
                &PlaylistItemsRequest {
                    uris: uris.to_vec(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn set_description(&self, playlist_id: &str, description: &str) -> Res<()> {
        self.send_unit(
            Method::PUT,
            &self.url(&format!("playlists/{playlist_id}")),
            &ChangePlaylistDetailsRequest {
                description: description.to_string(),
            },
        )
        .await
    }
}
