use std::{path::PathBuf, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};
use tabled::Table;

use crate::{
    Res, config, debug, error,
    generator::{GeneratorSettings, Outcome, QuotaGenerator, TierRun, TierSpec},
    info,
    management::TokenManager,
    spotify::{RequestPacer, SpotifyClient},
    success,
    types::TierResultRow,
    utils, warning,
};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub tiers_file: Option<PathBuf>,
    pub tier_filters: Vec<String>,
    pub dry_run: bool,
    pub parallel: bool,
    pub seed: Option<u64>,
}

struct TierReport {
    tier: TierSpec,
    run: TierRun,
    published: Result<(), String>,
}

impl TierReport {
    fn succeeded(&self) -> bool {
        self.run.outcome.is_filled() && self.published.is_ok()
    }
}

/// Generates every selected tier and replaces the matching playlists.
///
/// Configuration and credentials are checked before the first tier starts;
/// problems there are fatal. A tier that cannot be filled within its budget
/// is reported and its playlist is left as it was. Returns whether every
/// tier succeeded.
pub async fn generate(opts: GenerateOptions) -> bool {
    let settings = match config::generator_settings() {
        Ok(settings) => Arc::new(settings),
        Err(e) => error!("{}", e),
    };

    let tiers = match config::load_tiers(opts.tiers_file.as_deref()).await {
        Ok(tiers) => utils::select_tiers(tiers, &opts.tier_filters),
        Err(e) => error!("{}", e),
    };
    if tiers.is_empty() {
        error!("No tier matches {:?}", opts.tier_filters);
    }

    let delay = match config::request_delay() {
        Ok(delay) => delay,
        Err(e) => error!("{}", e),
    };

    let tokens = match TokenManager::resolve().await {
        Ok(tokens) => tokens,
        Err(e) => error!(
            "Failed to load token. Run sporlmix auth or set SPOTIFY_REFRESH_TOKEN.\n Error: {}",
            e
        ),
    };

    let client = Arc::new(SpotifyClient::new(
        tokens,
        Arc::new(RequestPacer::new(delay)),
    ));

    let user = match client.current_user().await {
        Ok(user) => user,
        Err(e) => error!("Credential check failed: {}", e),
    };
    info!(
        "Authenticated as {}",
        user.display_name.as_deref().unwrap_or(&user.id)
    );

    let timestamp = utils::now_timestamp();
    let reports = if opts.parallel {
        run_parallel(&client, &settings, tiers, &user.id, &timestamp, &opts).await
    } else {
        let mut reports = Vec::new();
        for (index, tier) in tiers.into_iter().enumerate() {
            let rng = tier_rng(opts.seed, index);
            reports.push(
                run_tier(
                    &client,
                    &settings,
                    tier,
                    &user.id,
                    &timestamp,
                    opts.dry_run,
                    rng,
                    true,
                )
                .await,
            );
        }
        reports
    };

    print_summary(&reports, &settings);
    debug!(
        "{} artists looked up during this run",
        client.artist_cache.count().await
    );
    reports.iter().all(TierReport::succeeded)
}

/// Runs every tier as its own task. The client, and with it the pacer, is
/// shared, so the tasks take turns against the API.
async fn run_parallel(
    client: &Arc<SpotifyClient>,
    settings: &Arc<GeneratorSettings>,
    tiers: Vec<TierSpec>,
    user_id: &str,
    timestamp: &str,
    opts: &GenerateOptions,
) -> Vec<TierReport> {
    let mut handles = Vec::new();

    for (index, tier) in tiers.into_iter().enumerate() {
        let client = Arc::clone(client);
        let settings = Arc::clone(settings);
        let user_id = user_id.to_string();
        let timestamp = timestamp.to_string();
        let dry_run = opts.dry_run;
        let rng = tier_rng(opts.seed, index);

        handles.push(tokio::spawn(async move {
            run_tier(
                &client, &settings, tier, &user_id, &timestamp, dry_run, rng, false,
            )
            .await
        }));
    }

    let mut reports = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(report) => reports.push(report),
            Err(e) => warning!("Task join error: {}", e),
        }
    }
    reports
}

fn tier_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_os_rng(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_tier(
    client: &SpotifyClient,
    settings: &GeneratorSettings,
    tier: TierSpec,
    user_id: &str,
    timestamp: &str,
    dry_run: bool,
    rng: StdRng,
    show_progress: bool,
) -> TierReport {
    info!("Generating {}", tier.name);

    let progress = if show_progress {
        utils::spinner(format!("{}: searching...", tier.name))
    } else {
        indicatif::ProgressBar::hidden()
    };

    let run = QuotaGenerator::new(client, settings, rng)
        .with_progress(progress.clone())
        .generate(&tier)
        .await;
    progress.finish_and_clear();

    for (reason, count) in &run.stats.rejections {
        debug!("[{}] rejected {} x {}", tier.name, count, reason);
    }

    let description = tier.describe(settings, timestamp);
    let published = match &run.outcome {
        Outcome::Filled(tracks) if dry_run => {
            info!("{} (dry run, playlist untouched)", tier.name);
            println!("    {}", description);
            for (i, id) in tracks.iter().enumerate() {
                println!("    {:>2}. {}", i + 1, id);
            }
            Ok(())
        }
        Outcome::Filled(tracks) => {
            match publish(client, user_id, &tier.name, tracks, &description).await {
                Ok(()) => {
                    success!("Updated: {} ({} tracks)", tier.name, tracks.len());
                    Ok(())
                }
                Err(e) => {
                    warning!("Failed to update playlist {}: {}", tier.name, e);
                    Err(e.to_string())
                }
            }
        }
        other => {
            warning!(
                "{} {} with {}; playlist left unchanged.",
                tier.name,
                other.label(),
                utils::outcome_fill(other, settings.track_count)
            );
            Ok(())
        }
    };

    TierReport {
        tier,
        run,
        published,
    }
}

async fn publish(
    client: &SpotifyClient,
    user_id: &str,
    name: &str,
    tracks: &[String],
    description: &str,
) -> Res<()> {
    let playlist_id = client.find_or_create(user_id, name).await?;
    client.replace_items(&playlist_id, tracks).await?;
    client.set_description(&playlist_id, description).await?;
    Ok(())
}

fn print_summary(reports: &[TierReport], settings: &GeneratorSettings) {
    let rows: Vec<TierResultRow> = reports
        .iter()
        .map(|r| TierResultRow {
            tier: r.tier.name.clone(),
            outcome: match &r.published {
                Ok(()) => r.run.outcome.label().to_string(),
                Err(_) => "publish failed".to_string(),
            },
            tracks: utils::outcome_fill(&r.run.outcome, settings.track_count),
            searches: r.run.stats.searches,
            rejected: r.run.stats.rejected(),
        })
        .collect();

    println!("\n{}\n", Table::new(rows));

    let succeeded = reports.iter().filter(|r| r.succeeded()).count();
    if succeeded == reports.len() {
        success!("All {} playlists generated.", succeeded);
    } else {
        warning!("{}/{} playlists generated.", succeeded, reports.len());
    }
}
