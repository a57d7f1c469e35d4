mod artist;
mod auth;

pub use artist::ArtistCache;
pub use auth::TokenManager;
