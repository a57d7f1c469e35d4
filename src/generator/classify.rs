//! Pure text classification used by the constraint evaluator.
//!
//! Script detection works on explicit Unicode range tables and genre keyword
//! lists carried as data, so a different target language or region only means
//! handing in different tables.

use std::ops::RangeInclusive;

use crate::types::{Artist, Track};

/// A set of inclusive code point ranges making up one or more scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRanges {
    ranges: Vec<RangeInclusive<char>>,
}

impl ScriptRanges {
    pub fn new(ranges: Vec<RangeInclusive<char>>) -> Self {
        Self { ranges }
    }

    /// True iff any character of `text` falls in one of the ranges.
    pub fn matches(&self, text: &str) -> bool {
        text.chars()
            .any(|ch| self.ranges.iter().any(|range| range.contains(&ch)))
    }
}

/// The language the target bucket is reserved for.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub name: String,
    pub script: ScriptRanges,
    pub seeds: Vec<String>,
}

impl LanguageProfile {
    pub fn hebrew() -> Self {
        let mut seeds: Vec<String> = "אבגדהוזחטיכלמנסעפצקרשת"
            .chars()
            .map(String::from)
            .collect();
        seeds.extend(["של", "את", "ים", "אה", "יו", "לי"].map(String::from));

        Self {
            name: "Hebrew".to_string(),
            script: ScriptRanges::new(vec!['\u{0590}'..='\u{05FF}']),
            seeds,
        }
    }

    /// Title, album title or any credited artist name is written in the
    /// target script.
    pub fn is_target_language(&self, track: &Track) -> bool {
        self.script.matches(&track.name)
            || self.script.matches(&track.album.name)
            || track.artists.iter().any(|a| self.script.matches(&a.name))
    }
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::hebrew()
    }
}

/// Scripts and genre keywords that mark a track as regional content.
#[derive(Debug, Clone)]
pub struct RegionalProfile {
    pub script: ScriptRanges,
    pub genre_keywords: Vec<String>,
}

impl RegionalProfile {
    pub fn arabic() -> Self {
        Self {
            script: ScriptRanges::new(vec![
                '\u{0600}'..='\u{06FF}',
                '\u{0750}'..='\u{077F}',
                '\u{08A0}'..='\u{08FF}',
                '\u{FB50}'..='\u{FDFF}',
                '\u{FE70}'..='\u{FEFF}',
            ]),
            genre_keywords: [
                "arab", "mizrahi", "khaleeji", "dabke", "turkish", "persian", "iranian",
                "egyptian", "lebanese", "maghreb", "shaabi",
            ]
            .map(String::from)
            .to_vec(),
        }
    }

    /// Regional when the title, album title or primary artist name uses a
    /// regional script, or the primary artist's genres mention a keyword.
    pub fn is_regional(&self, track: &Track, primary: &Artist) -> bool {
        if self.script.matches(&track.name)
            || self.script.matches(&track.album.name)
            || self.script.matches(&primary.name)
        {
            return true;
        }

        let genres = primary.genres.join(" ").to_lowercase();
        self.genre_keywords
            .iter()
            .any(|keyword| genres.contains(&keyword.to_lowercase()))
    }
}

impl Default for RegionalProfile {
    fn default() -> Self {
        Self::arabic()
    }
}

/// Matched as whole words, so "alive" and "oliver" pass.
const LIVE_WORDS: &[&str] = &["live", "session", "sessions"];
const REMIX_MARKERS: &[&str] = &["remix", " mix", "(mix", "[mix", "rmx"];
const KARAOKE_MARKERS: &[&str] = &["karaoke", "instrumental"];

/// Independently switchable filters for unwanted track versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantFilters {
    pub live: bool,
    pub remix: bool,
    pub karaoke: bool,
}

impl Default for VariantFilters {
    fn default() -> Self {
        Self {
            live: true,
            remix: true,
            karaoke: true,
        }
    }
}

impl VariantFilters {
    pub fn is_undesirable(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        let hit = |markers: &[&str]| markers.iter().any(|m| title.contains(m));
        let live_word = || {
            title
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| LIVE_WORDS.contains(&word))
        };

        (self.live && live_word())
            || (self.remix && hit(REMIX_MARKERS))
            || (self.karaoke && hit(KARAOKE_MARKERS))
    }
}

/// Reduces a title to the key used for near-duplicate detection.
///
/// Bracketed segments and anything after `" - "` are dropped, so
/// `"Song (feat. X)"` and `"Song - 2011 Remaster"` both become `"song"`.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let head = lowered.split(" - ").next().unwrap_or_default();

    let mut depth = 0usize;
    let mut kept = String::with_capacity(head.len());
    for ch in head.chars() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            c if c.is_alphanumeric() => kept.push(c),
            _ => kept.push(' '),
        }
    }

    let normalized = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        lowered.trim().to_string()
    } else {
        normalized
    }
}
