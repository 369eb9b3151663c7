use anyhow::{Context, Result};
use dataset_captioner::dedup::load_caption_map;
use dataset_captioner::OpenAiCaptioner;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn caption(matches: &clap::ArgMatches) -> Result<()> {
    let config = cli::caption_config(matches)?;
    config.validate()?;

    let captioner = OpenAiCaptioner::new(&config)?;
    dataset_captioner::run(&config, &captioner)
        .with_context(|| format!("captioning {} failed", config.input.display()))?;
    Ok(())
}

fn dedup(matches: &clap::ArgMatches) -> Result<()> {
    let path = cli::dedup_path(matches)?;
    let report = load_caption_map(&path)?;

    info!(
        "{} rows, {} duplicate filenames in {}",
        report.rows,
        report.duplicates(),
        path.display()
    );
    println!("{}", report.distinct());
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli::cli().get_matches();

    match matches.subcommand() {
        Some(("caption", sub)) => {
            init_tracing(sub.get_flag("verbose"))?;
            caption(sub)
        }
        Some(("dedup", sub)) => {
            init_tracing(sub.get_flag("verbose"))?;
            dedup(sub)
        }
        _ => unreachable!("subcommand_required is set"),
    }
}
