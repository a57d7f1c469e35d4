//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API. The generator only sees the
//! [`crate::generator::CandidateSource`] trait; this module provides its
//! implementation along with authentication and playlist management.
//!
//! ```text
//! CLI (generate, check, auth)
//!          ↓
//! SpotifyClient ── RequestPacer (shared, min spacing between calls)
//!     ├── catalog   search + artist lookup (CandidateSource)
//!     ├── playlist  find-or-create, replace items, description
//!     └── auth      PKCE flow, token refresh
//!          ↓
//! reqwest → Spotify Web API
//! ```
//!
//! ## Endpoints
//!
//! - `GET /search?type=track` - candidate batches, random offset
//! - `GET /artists?ids=` - follower counts and genres, 50 ids per call
//! - `GET /me`, `GET /me/playlists` - current user and playlist lookup
//! - `POST /users/{user_id}/playlists` - create a private playlist
//! - `PUT|POST /playlists/{id}/tracks` - replace and append items
//! - `PUT /playlists/{id}` - update the description
//! - `POST /api/token` - code exchange and refresh
//!
//! ## Rate limiting
//!
//! Every request first waits on the shared [`pacer::RequestPacer`]. On top of
//! that, `502` is retried after ten seconds and `429` honors `Retry-After` up
//! to two minutes.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod pacer;
pub mod playlist;

pub use client::SpotifyClient;
pub use pacer::RequestPacer;
