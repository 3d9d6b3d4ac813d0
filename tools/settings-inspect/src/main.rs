use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fretboard_domain::PageMode;
use fretboard_storage::{
    default_data_dir, keys, JsonFileKeyValue, JsonFileObjectStore, KeyValueStore,
};
use fretboard_stores::{HeadlessHost, TrainerStores};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspect persisted fretboard trainer settings"
)]
struct Args {
    /// Directory holding the trainer's storage files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every persisted settings domain as JSON
    Show,
    /// List stored presets, flagging inconsistent ones
    Presets,
    /// List the built-in exercises
    Exercises,
    /// Remove one settings domain so it falls back to defaults
    Reset {
        #[arg(value_enum)]
        domain: Domain,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Domain {
    Interval,
    User,
    Theme,
}

impl Domain {
    fn key(self) -> &'static str {
        match self {
            Domain::Interval => keys::INTERVAL_SETTINGS,
            Domain::User => keys::USER_SETTINGS,
            Domain::Theme => keys::THEME,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let data_dir = args
        .data_dir
        .or_else(default_data_dir)
        .ok_or_else(|| anyhow!("no data directory; pass --data-dir"))?;
    info!(dir = %data_dir.display(), "opening trainer storage");

    let key_value = Arc::new(JsonFileKeyValue::new(&data_dir));
    let objects = Arc::new(JsonFileObjectStore::new(&data_dir));

    match args.command {
        Command::Show => {
            let mut stores =
                TrainerStores::with_backends(key_value, objects, Arc::new(HeadlessHost));
            let interval_pause = stores.interval.correct_answer_sleep_time();
            stores.interval.set_current_page(PageMode::Modal);
            let modal_pause = stores.interval.correct_answer_sleep_time();
            let theme = if stores.theme.is_dark() { "dark" } else { "light" };
            let report = json!({
                "intervalSettings": stores.interval.settings(),
                "notes": stores.interval.notes(),
                "pauseMs": { "intervalTraining": interval_pause, "modal": modal_pause },
                "userSettings": stores.user.settings(),
                "theme": theme,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Presets => {
            let stores = TrainerStores::with_backends(key_value, objects, Arc::new(HeadlessHost));
            stores.presets.load_presets().await;
            let presets = stores.presets.presets();
            for preset in &presets {
                if let Err(err) = preset.validate() {
                    warn!(name = %preset.name, %err, "inconsistent preset");
                }
            }
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
        Command::Exercises => {
            let stores = TrainerStores::headless();
            for (name, exercise) in stores.exercises.iter() {
                println!(
                    "{name}: chord {} from string {}",
                    exercise.chord_name, exercise.bass_string
                );
            }
        }
        Command::Reset { domain } => {
            key_value.remove_item(domain.key())?;
            info!(key = domain.key(), "removed stored settings");
            println!("Reset {:?} settings to defaults", domain);
        }
    }
    Ok(())
}
