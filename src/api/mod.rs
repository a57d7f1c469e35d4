//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that `sporlmix auth`
//! starts while the user grants access in the browser.
//!
//! - [`callback`] - Completes the OAuth 2.0 PKCE flow by exchanging the
//!   authorization code for a token.
//! - [`health`] - Reports that the server is up, with name and version.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
