use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fxs::matcher::{verify_agreement, Algorithm};
use fxs::output::{self, JsonScan, TextResult};
use fxs::scan::{scan_paths, ScanOptions, ScanReport};
use fxs::utils::{self, AppConfig, ColorMode};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fxs")]
#[command(about = "Exact substring search with Boyer-Moore, KMP and Rabin-Karp")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pattern to search for (matched literally)
    pattern: Option<String>,

    /// Files or directories to search
    paths: Vec<PathBuf>,

    /// Algorithm: bm, kmp, rk, or all (runs every algorithm and checks they agree)
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Search this text instead of files (positions are character offsets)
    #[arg(short, long, conflicts_with = "paths")]
    text: Option<String>,

    /// Only search files whose name or relative path matches this glob
    #[arg(short, long)]
    glob: Option<String>,

    /// Print the number of matches per file
    #[arg(short, long)]
    count: bool,

    /// Print only the paths of files with matches
    #[arg(short = 'l', long)]
    files_with_matches: bool,

    /// Stop after this many matches per file
    #[arg(short, long)]
    max_count: Option<usize>,

    /// Group matches under a per-file heading
    #[arg(long)]
    heading: bool,

    /// Emit results as JSON
    #[arg(long)]
    json: bool,

    /// Report comparison and hash counters (with --text)
    #[arg(long, requires = "text")]
    stats: bool,

    /// When to use colors
    #[arg(long, value_enum)]
    color: Option<ColorMode>,

    /// Print diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Print the config file location
    Path,
    /// Change one setting (default_algorithm, color, max_file_size, skip_binary, threads)
    Set { key: String, value: String },
    /// Delete the config file, restoring defaults
    Reset,
}

/// Which scanners a search runs
#[derive(Clone, Copy)]
enum Selection {
    One(Algorithm),
    All,
}

impl Selection {
    fn resolve(arg: Option<&str>, config: &AppConfig) -> Result<Self> {
        match arg {
            None => Ok(Selection::One(config.default_algorithm)),
            Some(a) if a.eq_ignore_ascii_case("all") => Ok(Selection::All),
            Some(a) => Ok(Selection::One(a.parse()?)),
        }
    }

    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            Selection::One(algorithm) => vec![algorithm],
            Selection::All => Algorithm::ALL.to_vec(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("fxs: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether anything matched
fn run(mut cli: Cli) -> Result<bool> {
    if let Some(Commands::Config { action }) = cli.command.take() {
        handle_config_command(action.unwrap_or(ConfigAction::Show))?;
        return Ok(true);
    }

    let config = AppConfig::load()?;
    let Some(pattern) = cli.pattern.as_deref() else {
        bail!("a pattern is required (see --help)");
    };
    let selection = Selection::resolve(cli.algorithm.as_deref(), &config)?;
    let color = cli.color.unwrap_or(config.color);

    if cli.verbose {
        eprintln!("fxs: config {}", utils::get_config_path()?.display());
    }

    match cli.text.as_deref() {
        Some(text) => search_text(&cli, text, pattern, selection, color),
        None => search_files(&cli, &config, pattern, selection, color),
    }
}

fn search_text(cli: &Cli, text: &str, pattern: &str, selection: Selection, color: ColorMode) -> Result<bool> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    if let Selection::All = selection {
        verify_agreement(&text, &pattern)?;
    }

    let results: Vec<TextResult> = selection
        .algorithms()
        .into_iter()
        .map(|algorithm| {
            let (positions, stats) = algorithm.search_with_stats(&text, &pattern);
            TextResult {
                algorithm,
                positions,
                stats: cli.stats.then_some(stats),
            }
        })
        .collect();

    if cli.json {
        output::print_json(&results)?;
    } else {
        output::print_text_results(&results, color)?;
    }

    Ok(results.iter().any(|r| !r.positions.is_empty()))
}

fn search_files(
    cli: &Cli,
    config: &AppConfig,
    pattern: &str,
    selection: Selection,
    color: ColorMode,
) -> Result<bool> {
    // The global pool can only be set once; a second call is harmless
    let _ = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_threads())
        .build_global();

    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };

    let mut options = ScanOptions {
        algorithm: Algorithm::default(),
        glob: cli.glob.clone(),
        max_file_size: config.max_file_size,
        skip_binary: config.skip_binary,
        max_count: cli.max_count,
        verbose: cli.verbose,
    };

    let mut reports: Vec<(Algorithm, ScanReport)> = Vec::new();
    for algorithm in selection.algorithms() {
        options.algorithm = algorithm;
        let report = scan_paths(&roots, pattern.as_bytes(), &options)
            .with_context(|| format!("{} scan failed", algorithm.name()))?;
        reports.push((algorithm, report));
    }

    let (algorithm, report) = &reports[0];
    for (other, other_report) in &reports[1..] {
        if other_report.matches != report.matches {
            bail!(
                "{} found {} matches but {} found {}",
                other.name(),
                other_report.summary.matches,
                algorithm.name(),
                report.summary.matches
            );
        }
    }

    if cli.json {
        output::print_json(&JsonScan {
            algorithm: *algorithm,
            pattern,
            report,
        })?;
    } else if cli.files_with_matches {
        output::print_files_only(&report.matches, color)?;
    } else if cli.count {
        output::print_match_counts(&report.matches, color)?;
    } else {
        output::print_file_matches(&report.matches, pattern.len(), color, cli.heading)?;
    }

    Ok(!report.matches.is_empty())
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            output::print_json(&config)?;
        }
        ConfigAction::Path => {
            println!("{}", utils::get_config_path()?.display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Reset => {
            utils::reset_config()?;
            println!("Configuration reset to defaults");
        }
    }

    Ok(())
}
