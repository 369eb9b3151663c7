use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use dataset_captioner::config::{
    CaptionConfig, DEFAULT_ALLOW_LIST, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_OUTPUT,
};

pub fn cli() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(caption_command())
        .subcommand(dedup_command())
}

fn caption_command() -> Command {
    Command::new("caption")
        .about("Caption every allow-listed image in a directory or zip archive")
        .next_help_heading("CAPTION OPTIONS")
        .args([
            Arg::new("input")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory of images or a zip archive"),
            Arg::new("output")
                .long("output")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT)
                .help("CSV file to write (truncated first)"),
            Arg::new("api-key")
                .long("api-key")
                .env("OPENAI_API_KEY")
                .hide_env_values(true)
                .help("Bearer token for the captioning service"),
            Arg::new("allow-list")
                .long("allow-list")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_ALLOW_LIST)
                .help("JSON list of filenames eligible for captioning"),
            Arg::new("max-tokens")
                .long("max-tokens")
                .value_parser(value_parser!(u32))
                .default_value("50")
                .help("Upper bound on generated tokens per caption"),
            Arg::new("model")
                .long("model")
                .default_value(DEFAULT_MODEL)
                .help("Model identifier sent with each request"),
            Arg::new("endpoint")
                .long("endpoint")
                .default_value(DEFAULT_ENDPOINT)
                .help("Chat completion endpoint"),
            Arg::new("timeout")
                .long("timeout")
                .value_parser(value_parser!(u64))
                .default_value("60")
                .help("Per-request timeout in seconds"),
            Arg::new("scratch-dir")
                .long("scratch-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Where to extract zip archives (defaults to the system temp dir)"),
        ])
}

fn dedup_command() -> Command {
    Command::new("dedup")
        .about("Count distinct image filenames in a caption CSV")
        .arg(
            Arg::new("csv")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT)
                .help("Caption CSV produced by the caption command"),
        )
}

pub fn caption_config(matches: &ArgMatches) -> Result<CaptionConfig> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing input path")?;
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .unwrap_or_default();

    let mut config = CaptionConfig::new(input, api_key);
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        config = config.with_output(output);
    }
    if let Some(allow_list) = matches.get_one::<PathBuf>("allow-list") {
        config = config.with_allow_list(allow_list);
    }
    if let Some(max_tokens) = matches.get_one::<u32>("max-tokens") {
        config = config.with_max_tokens(*max_tokens);
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model);
    }
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config = config.with_endpoint(endpoint);
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*timeout));
    }
    if let Some(scratch_dir) = matches.get_one::<PathBuf>("scratch-dir") {
        config = config.with_scratch_dir(scratch_dir);
    }
    Ok(config)
}

pub fn dedup_path(matches: &ArgMatches) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>("csv")
        .cloned()
        .context("missing csv path")
}
