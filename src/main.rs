use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

use cssvarcheck::{Config, Finder, GitRunner, ReportFormat, Reporter};

/// Finds CSS variables in the codebase that are prefixed with the targets'
/// CSS prefix but aren't specified in the targets, and variables the targets
/// generate that the codebase never uses.
#[derive(Parser, Debug)]
#[command(name = "cssvarcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source JSON5 color files
    #[arg(required = true, value_name = "TARGET")]
    targets: Vec<PathBuf>,

    /// Repository root the search runs from
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Regex of variable names never reported (can be specified multiple times)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Exit with status 1 when anything is reported
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("cssvarcheck v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let clean = run(&config, &cli)?;

    if cli.strict && !clean {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.root)?
    };

    // Override with CLI arguments
    config.ignore.extend(cli.ignore.iter().cloned());
    if let Some(format) = &cli.format {
        config.report.format = format.clone();
    }

    Ok(config)
}

/// Returns whether the report came back clean
fn run(config: &Config, cli: &Cli) -> Result<bool> {
    let format: ReportFormat = config
        .report
        .format
        .parse()
        .map_err(|e: String| miette::miette!("{}", e))?;

    let mut file_contents = Vec::with_capacity(cli.targets.len());
    for target in &cli.targets {
        let contents = std::fs::read_to_string(target)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", target.display()))?;
        file_contents.push((target.display().to_string(), contents));
    }

    let finder = Finder::new()
        .with_globs(config.search.globs.clone())
        .with_ignore_patterns(&config.ignore)?;
    let runner = GitRunner::new(&cli.root).with_program(config.search.program.clone());

    let report = finder.find(file_contents, &runner)?;

    info!(
        "Checked {} prefix(es), {} finding(s)",
        report.len(),
        report.total_findings()
    );

    let color = cli.output.is_none() && std::io::stdout().is_terminal();
    Reporter::new(format, cli.output.clone())
        .with_color(color)
        .report(&report)?;

    Ok(report.is_clean())
}
