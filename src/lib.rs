//! Tiered Spotify playlist generator library
//!
//! This library fills a set of playlists, one per artist-popularity tier, by
//! repeatedly sampling the Spotify catalog search with short seed queries and
//! keeping only the tracks that satisfy every quota of the tier: a fixed share
//! of target-language tracks, a per-artist cap, a cap on regional content, a
//! popularity floor and a follower-count band.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Environment configuration and generator settings
//! - `generator` - Classifiers, seed selection, constraint evaluation and the sampling loop
//! - `management` - Token persistence and the in-memory artist cache
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use sporlmix::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> sporlmix::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod generator;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with `Send + Sync` bounds so that
/// results can cross task boundaries when tiers run concurrently.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Generating tier {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal conditions such as missing configuration or an
/// invalid credential, where no tier can run at all.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line, only when verbose output is enabled.
///
/// Verbose output is switched on by `--verbose` or a truthy
/// `SPORLMIX_VERBOSE` environment variable.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::verbose() {
      use colored::Colorize;
      println!("[{}] {}", ".".dimmed(), format!($($arg)*).dimmed());
    }
  })
}
