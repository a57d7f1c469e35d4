use std::path::PathBuf;

use tabled::Table;

use crate::{config, error, info, types::TierTableRow, utils};

/// Prints the tier table with the policy each tier derives from the current
/// settings.
pub async fn tiers(tiers_file: Option<PathBuf>) {
    let settings = match config::generator_settings() {
        Ok(settings) => settings,
        Err(e) => error!("{}", e),
    };

    let tiers = match config::load_tiers(tiers_file.as_deref()).await {
        Ok(tiers) => tiers,
        Err(e) => error!("{}", e),
    };

    let rows: Vec<TierTableRow> = tiers
        .iter()
        .map(|tier| {
            let policy = tier.policy(&settings);
            let (mode, popularity) = utils::describe_policy(&policy);
            TierTableRow {
                name: tier.name.clone(),
                followers: tier.follower_band(),
                mode,
                popularity,
                market: if policy.market.is_empty() {
                    "-".to_string()
                } else {
                    policy.market.clone()
                },
            }
        })
        .collect();

    println!("\n{}\n", Table::new(rows));
    info!(
        "{} tracks per playlist, {}% {}, max {} per artist",
        settings.track_count,
        settings.target_percent(),
        settings.language.name,
        settings.artist_cap
    );
}
