use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};
use sporlmix::{
    Res,
    generator::{
        CandidateSource, GeneratorSettings, LanguageProfile, Outcome, QuotaGenerator, Rejection,
        TierSpec,
    },
    types::{AlbumRef, Artist, ArtistRef, Track},
};

const BATCH: usize = 10;
const ARTISTS: usize = 40;

/// Catalog that invents a fresh batch for every search: Hebrew titles for
/// Hebrew seeds, Latin ones otherwise. Every fifth track carries an Arabic
/// album title.
struct FakeCatalog {
    calls: AtomicUsize,
    produced: AtomicUsize,
    empty_first: usize,
    followers: Option<u64>,
    popularity: u32,
    know_artists: bool,
    fail_artists: bool,
    fail_search: bool,
    requests: Mutex<Vec<(String, String)>>,
    tracks: Mutex<HashMap<String, Track>>,
}

impl FakeCatalog {
    fn new(followers: Option<u64>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            produced: AtomicUsize::new(0),
            empty_first: 0,
            followers,
            popularity: 60,
            know_artists: true,
            fail_artists: false,
            fail_search: false,
            requests: Mutex::new(Vec::new()),
            tracks: Mutex::new(HashMap::new()),
        }
    }

    fn track(&self, id: &str) -> Track {
        self.tracks.lock().unwrap()[id].clone()
    }

    fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

fn is_hebrew(text: &str) -> bool {
    LanguageProfile::hebrew().script.matches(text)
}

#[async_trait]
impl CandidateSource for FakeCatalog {
    async fn search(&self, seed: &str, market: &str) -> Res<Vec<Track>> {
        self.requests
            .lock()
            .unwrap()
            .push((seed.to_string(), market.to_string()));

        if self.fail_search {
            return Err("search unavailable".into());
        }
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.empty_first {
            return Ok(Vec::new());
        }

        let start = self.produced.fetch_add(BATCH, Ordering::SeqCst);
        let batch: Vec<Track> = (start..start + BATCH)
            .map(|n| Track {
                id: Some(format!("track-{n}")),
                name: if is_hebrew(seed) {
                    format!("שיר {n}")
                } else {
                    format!("Song {n}")
                },
                popularity: self.popularity,
                artists: vec![ArtistRef {
                    id: Some(format!("artist-{}", n % ARTISTS)),
                    name: format!("Artist {}", n % ARTISTS),
                }],
                album: AlbumRef {
                    name: if n % 5 == 0 {
                        "ألبوم".to_string()
                    } else {
                        "Album".to_string()
                    },
                },
            })
            .collect();

        let mut tracks = self.tracks.lock().unwrap();
        for t in &batch {
            if let Some(id) = &t.id {
                tracks.insert(id.clone(), t.clone());
            }
        }
        Ok(batch)
    }

    async fn artists(&self, ids: &[String]) -> Res<HashMap<String, Artist>> {
        if self.fail_artists {
            return Err("artist lookup unavailable".into());
        }
        if !self.know_artists {
            return Ok(HashMap::new());
        }

        Ok(ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    Artist {
                        id: id.clone(),
                        name: id.replace('-', " "),
                        followers: self.followers,
                        genres: Vec::new(),
                    },
                )
            })
            .collect())
    }
}

fn settings() -> GeneratorSettings {
    GeneratorSettings {
        max_searches: Some(200),
        max_duration: None,
        ..GeneratorSettings::default()
    }
}

fn tier_a() -> TierSpec {
    TierSpec::new("Random Songs A", Some(0), Some(200))
}

#[tokio::test]
async fn test_fills_tier_with_all_invariants() {
    let catalog = FakeCatalog::new(Some(100));
    let settings = settings();
    let tier = tier_a();

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(7))
        .generate(&tier)
        .await;

    let Outcome::Filled(ids) = &run.outcome else {
        panic!("expected a filled tier, got {:?}", run.outcome.label());
    };
    assert_eq!(ids.len(), 50);

    // No duplicates
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), 50);

    let tracks: Vec<Track> = ids.iter().map(|id| catalog.track(id)).collect();

    // Exactly 15 Hebrew tracks
    let hebrew = LanguageProfile::hebrew();
    assert_eq!(
        tracks.iter().filter(|t| hebrew.is_target_language(t)).count(),
        15
    );

    // At most 3 per artist
    let mut per_artist: HashMap<String, usize> = HashMap::new();
    for t in &tracks {
        let artist = t.primary_artist().and_then(|a| a.id.clone()).unwrap();
        *per_artist.entry(artist).or_insert(0) += 1;
    }
    assert!(per_artist.values().all(|&count| count <= 3));

    // At most 3 regional tracks
    let regional = tracks.iter().filter(|t| t.album.name != "Album").count();
    assert!(regional <= 3);

    assert_eq!(run.stats.accepted, 50);
    assert!(run.stats.rejections.contains_key(&Rejection::RegionalCapReached));
}

#[tokio::test]
async fn test_seeds_follow_bucket_need() {
    let catalog = FakeCatalog::new(Some(100));
    let settings = settings();

    QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(11))
        .generate(&tier_a())
        .await;

    let requests = catalog.requests();
    let first_other = requests
        .iter()
        .position(|(seed, _)| !is_hebrew(seed))
        .unwrap();

    // Hebrew seeds until the target bucket is full, then obscure seeds only
    assert!(first_other > 0);
    assert!(requests[first_other..].iter().all(|(seed, _)| !is_hebrew(seed)));
    assert!(
        requests[first_other..]
            .iter()
            .all(|(seed, _)| settings.seeds.obscure.contains(seed))
    );
    assert!(requests.iter().all(|(_, market)| market == "IL"));
}

#[tokio::test]
async fn test_mainstream_tier_uses_mainstream_seeds_and_market() {
    let catalog = FakeCatalog::new(Some(120_000));
    let settings = settings();
    let tier = TierSpec::new("Random Songs E", Some(50_000), None);

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(3))
        .generate(&tier)
        .await;
    assert!(run.outcome.is_filled());

    let requests = catalog.requests();
    assert!(requests.iter().all(|(_, market)| market == "US"));
    assert!(
        requests
            .iter()
            .filter(|(seed, _)| !is_hebrew(seed))
            .all(|(seed, _)| settings.seeds.mainstream.contains(seed))
    );
}

#[tokio::test]
async fn test_popularity_floor_blocks_mainstream_tier() {
    let mut catalog = FakeCatalog::new(Some(120_000));
    catalog.popularity = 20;
    let settings = GeneratorSettings {
        max_searches: Some(5),
        ..settings()
    };
    let tier = TierSpec::new("Random Songs E", Some(50_000), None);

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(3))
        .generate(&tier)
        .await;

    assert!(run.outcome.tracks().is_empty());
    assert_eq!(
        run.stats.rejections[&Rejection::BelowPopularityFloor],
        run.stats.candidates
    );
}

#[tokio::test]
async fn test_empty_batches_are_retried() {
    let mut catalog = FakeCatalog::new(Some(100));
    catalog.empty_first = 3;
    let settings = settings();

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(5))
        .generate(&tier_a())
        .await;

    assert!(run.outcome.is_filled());
    assert_eq!(run.stats.empty_batches, 3);
}

#[tokio::test]
async fn test_search_budget_gives_partial_outcome() {
    let catalog = FakeCatalog::new(Some(100));
    let settings = GeneratorSettings {
        max_searches: Some(1),
        ..settings()
    };

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(5))
        .generate(&tier_a())
        .await;

    assert_eq!(run.stats.searches, 1);
    match run.outcome {
        Outcome::PartiallyFilled {
            tracks,
            target_count,
            other_count,
        } => {
            // One Hebrew batch of ten, all accepted into the target bucket
            assert_eq!(target_count, 10);
            assert_eq!(other_count, 0);
            assert_eq!(tracks.len(), 10);
        }
        other => panic!("expected partial outcome, got {}", other.label()),
    }
}

#[tokio::test]
async fn test_zero_duration_times_out() {
    let catalog = FakeCatalog::new(Some(100));
    let settings = GeneratorSettings {
        max_duration: Some(Duration::ZERO),
        ..settings()
    };

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(5))
        .generate(&tier_a())
        .await;

    assert!(matches!(run.outcome, Outcome::TimedOut { .. }));
    assert!(run.outcome.tracks().is_empty());
    assert_eq!(run.stats.searches, 0);
}

#[tokio::test]
async fn test_unknown_artists_only_pass_open_tiers() {
    let mut catalog = FakeCatalog::new(Some(100));
    catalog.know_artists = false;
    let settings = GeneratorSettings {
        max_searches: Some(10),
        ..settings()
    };

    let bounded = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(9))
        .generate(&tier_a())
        .await;
    assert!(bounded.outcome.tracks().is_empty());
    assert!(
        bounded
            .stats
            .rejections
            .contains_key(&Rejection::FollowersOutOfBand)
    );

    let open = TierSpec::new("Anything", None, None);
    let unbounded = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(9))
        .generate(&open)
        .await;
    assert!(unbounded.outcome.is_filled());
}

#[tokio::test]
async fn test_failed_artist_lookup_skips_batch() {
    let mut catalog = FakeCatalog::new(Some(100));
    catalog.fail_artists = true;
    let settings = GeneratorSettings {
        max_searches: Some(4),
        ..settings()
    };

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(1))
        .generate(&tier_a())
        .await;

    assert!(matches!(run.outcome, Outcome::PartiallyFilled { .. }));
    assert!(run.outcome.tracks().is_empty());
    assert_eq!(run.stats.failed_calls, 4);
    assert_eq!(run.stats.candidates, 0);
}

#[tokio::test]
async fn test_failed_search_counts_against_budget() {
    let mut catalog = FakeCatalog::new(Some(100));
    catalog.fail_search = true;
    let settings = GeneratorSettings {
        max_searches: Some(3),
        ..settings()
    };

    let run = QuotaGenerator::new(&catalog, &settings, StdRng::seed_from_u64(1))
        .generate(&tier_a())
        .await;

    assert_eq!(run.stats.searches, 3);
    assert_eq!(run.stats.failed_calls, 3);
    assert_eq!(catalog.requests().len(), 3);
}

#[tokio::test]
async fn test_same_rng_seed_is_reproducible() {
    let settings = settings();
    let tier = tier_a();

    let first_catalog = FakeCatalog::new(Some(100));
    let first = QuotaGenerator::new(&first_catalog, &settings, StdRng::seed_from_u64(42))
        .generate(&tier)
        .await;

    let second_catalog = FakeCatalog::new(Some(100));
    let second = QuotaGenerator::new(&second_catalog, &settings, StdRng::seed_from_u64(42))
        .generate(&tier)
        .await;

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first_catalog.requests(), second_catalog.requests());
}
