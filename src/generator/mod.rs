//! # Playlist Generator
//!
//! The quota-constrained sampling core. Given a tier (a band of artist
//! follower counts) it keeps drawing seed queries, fetching candidate batches
//! from a [`CandidateSource`] and filtering them until the playlist holds
//! exactly the configured number of tracks.
//!
//! ```text
//! QuotaGenerator
//!     ├── SeedPools::pick_seed        which query to try next
//!     ├── CandidateSource             search batch + artist metadata
//!     ├── Evaluator                   ordered filter chain
//!     │     └── classify              script, region and variant checks
//!     └── GeneratorState              buckets, caps and de-dup sets
//! ```
//!
//! A run ends as [`Outcome::Filled`] once both buckets are full, or with a
//! partial outcome when the search or time budget is spent. Nothing in this
//! module performs I/O directly; all of it goes through the source.

pub mod classify;
pub mod evaluate;
pub mod quota;
pub mod seeds;
pub mod settings;
pub mod source;
pub mod state;
pub mod tier;

pub use classify::{LanguageProfile, RegionalProfile, ScriptRanges, VariantFilters};
pub use evaluate::{Evaluator, Rejection, Verdict};
pub use quota::{Outcome, QuotaGenerator, RunStats, TierRun};
pub use seeds::SeedPools;
pub use settings::GeneratorSettings;
pub use source::{BATCH_LIMIT, CandidateSource};
pub use state::{Acceptance, GeneratorState, Quota};
pub use tier::{TierPolicy, TierSpec, default_tiers};
