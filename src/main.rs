use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, Level};

use hivex_aggregate::config::{load_config, validate_config, Config};
use hivex_aggregate::output::{
    format_rejections, format_run_summary, format_score_breakdown, should_use_colors,
};
use hivex_aggregate::pipeline;
use hivex_aggregate::records::{loader::load_record, validate_report, DataSource};
use hivex_aggregate::scoring::calculate_score;

const EXIT_SUCCESS: i32 = 0;
const EXIT_OUTPUT: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_INVALID: i32 = 3;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build index.json, results-<slug>.json and leaderboard.json (default if no subcommand)
    Aggregate {
        /// Compute everything and print the summary without writing files
        #[arg(long)]
        dry_run: bool,
    },
    /// List every project and result record that would be skipped, and why
    Validate,
    /// Show how a single result.json is scored
    Score {
        /// Path to a result.json file
        file: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "hivex-aggregate")]
#[command(about = "Aggregate contribution reports into a project index and leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (defaults to ./hivex.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory containing the project/ tree (overrides config)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Directory to write documents to (overrides config)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let command = cli.command.unwrap_or(Commands::Aggregate { dry_run: false });
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(input) = cli.input {
        config.input_dir = input;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }

    // Validate config at startup
    if let Err(errors) = validate_config(&config) {
        error!("Config errors:");
        for e in errors {
            error!("  - {}", e);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = should_use_colors();
    let code = match command {
        Commands::Aggregate { dry_run } => aggregate(&config, dry_run, start_time, use_colors),
        Commands::Validate => validate(&config, use_colors),
        Commands::Score { file } => score(&config, &file, use_colors),
    };
    std::process::exit(code);
}

fn aggregate(config: &Config, dry_run: bool, start_time: Instant, use_colors: bool) -> i32 {
    info!("Starting aggregation of {}", config.input_dir.display());
    let (_collected, run) = pipeline::run(config, Utc::now());

    if dry_run {
        info!("Dry run: nothing written");
    } else if let Err(e) = pipeline::publish(&run, &config.output_dir) {
        error!("Error during aggregation: {:#}", e);
        return EXIT_OUTPUT;
    }

    println!(
        "{}",
        format_run_summary(&run.stats, start_time.elapsed(), use_colors)
    );
    EXIT_SUCCESS
}

fn validate(config: &Config, use_colors: bool) -> i32 {
    let source = DataSource::new(config.input_dir.clone());
    let collected = pipeline::collect(&source, &config.scoring);

    println!("{}", format_rejections(collected.skipped(), use_colors));
    if collected.skipped_count() > 0 {
        EXIT_INVALID
    } else {
        EXIT_SUCCESS
    }
}

fn score(config: &Config, file: &Path, use_colors: bool) -> i32 {
    match load_record(file, validate_report) {
        Ok(report) => {
            let scored = calculate_score(&report, &config.scoring);
            println!("{}", format_score_breakdown(&report, &scored, use_colors));
            EXIT_SUCCESS
        }
        Err(e) => {
            println!("{}", format_rejections([&e], use_colors));
            EXIT_INVALID
        }
    }
}
