use sporlmix::generator::{GeneratorSettings, TierSpec, default_tiers};

#[test]
fn test_description_matches_format() {
    let settings = GeneratorSettings::default();
    let tier = TierSpec::new("Random Songs B", Some(200), Some(1000));

    assert_eq!(
        tier.summary(&settings),
        "Followers: >200 and <1000. Hebrew % = 30%. Max 3 songs/artist."
    );
    assert_eq!(
        tier.describe(&settings, "2025-01-31 08:00:00"),
        "Auto-updated at 2025-01-31 08:00:00. Followers: >200 and <1000. Hebrew % = 30%. Max 3 songs/artist."
    );
}

#[test]
fn test_description_follows_settings() {
    let settings = GeneratorSettings {
        target_fraction: 0.5,
        artist_cap: 2,
        ..GeneratorSettings::default()
    };
    let tier = TierSpec::new("E", Some(50_000), None);

    assert_eq!(
        tier.summary(&settings),
        "Followers: >50000. Hebrew % = 50%. Max 2 songs/artist."
    );
}

#[test]
fn test_follower_band() {
    assert_eq!(TierSpec::new("A", Some(0), Some(200)).follower_band(), "<200");
    assert_eq!(TierSpec::new("A", None, Some(200)).follower_band(), "<200");
    assert_eq!(
        TierSpec::new("C", Some(1000), Some(10_000)).follower_band(),
        ">1000 and <10000"
    );
    assert_eq!(TierSpec::new("E", Some(50_000), None).follower_band(), ">50000");
    assert_eq!(TierSpec::new("Any", None, None).follower_band(), "any");
}

#[test]
fn test_bounds_are_inclusive() {
    let tier = TierSpec::new("B", Some(200), Some(1000));

    assert!(tier.admits_followers(Some(200)));
    assert!(tier.admits_followers(Some(1000)));
    assert!(tier.admits_followers(Some(500)));
    assert!(!tier.admits_followers(Some(199)));
    assert!(!tier.admits_followers(Some(1001)));
}

#[test]
fn test_unknown_followers() {
    // Unknown counts fail a finite upper bound ...
    assert!(!TierSpec::new("A", Some(0), Some(200)).admits_followers(None));
    // ... and clear any lower bound
    assert!(TierSpec::new("E", Some(50_000), None).admits_followers(None));
    assert!(TierSpec::new("Any", None, None).admits_followers(None));
}

#[test]
fn test_policy_for_obscure_tier() {
    let settings = GeneratorSettings::default();
    let policy = TierSpec::new("D", Some(10_000), Some(50_000)).policy(&settings);

    assert!(!policy.mainstream);
    assert_eq!(policy.popularity_floor, None);
    assert_eq!(policy.market, "IL");
}

#[test]
fn test_policy_for_mainstream_tier() {
    let settings = GeneratorSettings::default();
    let policy = TierSpec::new("E", Some(50_000), None).policy(&settings);

    assert!(policy.mainstream);
    assert_eq!(policy.popularity_floor, Some(55));
    assert_eq!(policy.market, "US");
}

#[test]
fn test_policy_for_star_tier() {
    let settings = GeneratorSettings::default();
    let policy = TierSpec::new("Stars", Some(500_000), None).policy(&settings);

    assert!(policy.mainstream);
    assert_eq!(policy.popularity_floor, Some(70));
}

#[test]
fn test_default_tiers() {
    let tiers = default_tiers();
    assert_eq!(tiers.len(), 5);

    // Bands are contiguous and only the last one is open-ended
    for pair in tiers.windows(2) {
        assert_eq!(pair[0].max, pair[1].min);
    }
    assert_eq!(tiers[0].min, Some(0));
    assert_eq!(tiers[4].max, None);
    assert!(tiers.iter().all(|t| t.name.starts_with("Random Songs")));
}

#[test]
fn test_settings_quotas() {
    let settings = GeneratorSettings::default();

    assert_eq!(settings.target_quota(), 15);
    assert_eq!(settings.other_quota(), 35);
    assert_eq!(settings.regional_cap(), 3);
    assert_eq!(settings.target_percent(), 30);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_quota_rounding() {
    let settings = GeneratorSettings {
        track_count: 10,
        target_fraction: 0.25,
        ..GeneratorSettings::default()
    };
    // 2.5 rounds up
    assert_eq!(settings.target_quota(), 3);
    assert_eq!(settings.other_quota(), 7);
    // 0.6 floors
    assert_eq!(settings.regional_cap(), 0);
}

#[test]
fn test_settings_validation() {
    let zero_tracks = GeneratorSettings {
        track_count: 0,
        ..GeneratorSettings::default()
    };
    assert!(zero_tracks.validate().is_err());

    let zero_cap = GeneratorSettings {
        artist_cap: 0,
        ..GeneratorSettings::default()
    };
    assert!(zero_cap.validate().is_err());

    let bad_fraction = GeneratorSettings {
        target_fraction: 1.5,
        ..GeneratorSettings::default()
    };
    assert!(bad_fraction.validate().is_err());

    let mut empty_pool = GeneratorSettings::default();
    empty_pool.seeds.obscure.clear();
    assert!(empty_pool.validate().is_err());
}

#[test]
fn test_zero_min_open_max_accepts_everything() {
    let tier = TierSpec::new("Everything", Some(0), None);

    assert!(tier.admits_followers(Some(0)));
    assert!(tier.admits_followers(Some(50_000_000)));
    assert!(tier.admits_followers(None));
}
