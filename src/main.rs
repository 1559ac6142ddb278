use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

use twenty48::core::config::{self, CliOverrides, TwentyConfig};
use twenty48::tui;

#[derive(Parser)]
#[command(name = "twenty48", about = "Slide and merge tiles to reach 2048")]
struct Args {
    /// Seed the tile spawner for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the saved game and log file
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Start a new game instead of resuming (best score is kept)
    #[arg(long)]
    new_game: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Config errors and warnings are reported after the logger is up
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (TwentyConfig::default(), Some(e)),
    };
    let cli = CliOverrides {
        data_dir: args.data_dir,
        seed: args.seed,
        new_game: args.new_game,
    };
    let resolved = config::resolve(&file_config, &cli);

    // Initialize file logger - writes to twenty48.log in the data directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if fs::create_dir_all(&resolved.data_dir).is_ok()
        && let Ok(log_file) = File::create(resolved.data_dir.join("twenty48.log"))
    {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    for warning in &resolved.warnings {
        log::warn!("{}", warning);
    }
    log::info!(
        "twenty48 starting up (data dir {}, seed {:?})",
        resolved.data_dir.display(),
        resolved.seed
    );

    tui::run(resolved)
}
