use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use soma::core::config::{self, CliOverrides};
use soma::core::engine::Granularity;
use soma::core::phrases::Locale;
use soma::core::progress::ProgressStore;
use soma::tui;

#[derive(Parser)]
#[command(name = "soma", about = "Interactive column-addition tutor")]
struct Args {
    /// Step granularity: one column per step, or announce + commit
    #[arg(short, long, value_enum)]
    granularity: Option<Granularity>,

    /// Language for descriptions and narration
    #[arg(short, long, value_enum)]
    locale: Option<Locale>,

    /// Path to a TOML exercise catalog
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Speak each step out loud
    #[arg(short, long)]
    narrate: bool,

    /// Delete saved progress and exit
    #[arg(long)]
    reset_progress: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to soma.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("soma.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    if args.reset_progress {
        ProgressStore::default_location()?.clear()?;
        println!("Saved progress cleared");
        return Ok(());
    }

    let file_config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring config file: {e}");
            log::warn!("Ignoring config file: {e}");
            Default::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            granularity: args.granularity,
            locale: args.locale,
            catalog: args.catalog,
            narrate: args.narrate,
        },
    );

    log::info!(
        "Soma starting up: granularity {:?}, locale {:?}",
        resolved.granularity,
        resolved.locale
    );

    tui::run(resolved)
}
