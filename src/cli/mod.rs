//! # CLI Module
//!
//! User-facing commands. Each one loads what it needs from [`crate::config`],
//! builds a [`crate::spotify::SpotifyClient`] where the API is involved and
//! reports through the logging macros.
//!
//! - [`auth`] - PKCE authorization, caches the token and prints the refresh token
//! - [`check`] - refreshes the token and fetches the current user
//! - [`tiers`] - prints the tier table with derived policies
//! - [`generate`] - runs the quota generator per tier and replaces the playlists
//!
//! ```bash
//! sporlmix auth
//! sporlmix check
//! sporlmix generate --tier "Random Songs A" --dry-run
//! sporlmix generate --parallel --seed 42
//! ```

mod auth;
mod check;
mod generate;
mod tiers;

pub use auth::auth;
pub use check::check;
pub use generate::{GenerateOptions, generate};
pub use tiers::tiers;
