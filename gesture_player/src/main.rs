//! gesture_player — interactive entry point.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use gesture_player::app::{run, run_search};
use gesture_player::cli::{Args, SourceKind};
use gesture_player::config::AppConfig;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let mut cfg = AppConfig::load_or_default(&args.config);
    args.apply(&mut cfg);

    if let Some(query) = &args.search {
        let hits = run_search(&cfg, query)?;
        if hits.is_empty() {
            println!("no matches for {:?}", query);
        }
        for song in hits {
            println!("{:<24} {:<20} {:>5}  {}", song.title, song.artist, song.duration_label(), song.id);
        }
        return Ok(());
    }

    if !args.headless {
        println!();
        println!("  Gesture Player");
        if args.source == SourceKind::Sim {
            println!("  Mouse = fingertip   Space/click = pinch   Shift/S = scroll   O = open hand   Q = quit");
        }
        println!();
    }

    run(cfg, &args)
}
