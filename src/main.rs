use std::{path::PathBuf, sync::Arc};

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlmix::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Verify the configured credentials against the API
    Check,

    /// Show the configured tiers and their derived policies
    Tiers(TiersOptions),

    /// Fill the tier playlists with freshly sampled tracks
    Generate(GenerateOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TiersOptions {
    /// JSON file with the tier table (defaults to SPORLMIX_TIERS_FILE or the built-in tiers)
    #[clap(long = "tiers")]
    pub tiers_file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Only run tiers whose name contains this text; can be repeated
    #[clap(long = "tier", action = ArgAction::Append, num_args = 1)]
    pub tiers: Vec<String>,

    /// JSON file with the tier table
    #[clap(long = "tiers")]
    pub tiers_file: Option<PathBuf>,

    /// Print the selection instead of updating playlists
    #[clap(long)]
    pub dry_run: bool,

    /// Run all tiers concurrently against the shared rate limit
    #[clap(long)]
    pub parallel: bool,

    /// Seed for seed-word selection and shuffling
    #[clap(long)]
    pub seed: Option<u64>,

    /// Print accept/reject details
    #[clap(long, short)]
    pub verbose: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Check => cli::check().await,
        Command::Tiers(opt) => cli::tiers(opt.tiers_file).await,
        Command::Generate(opt) => {
            if opt.verbose {
                config::set_verbose(true);
            }

            let ok = cli::generate(cli::GenerateOptions {
                tiers_file: opt.tiers_file,
                tier_filters: opt.tiers,
                dry_run: opt.dry_run,
                parallel: opt.parallel,
                seed: opt.seed,
            })
            .await;

            if !ok {
                std::process::exit(1);
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
