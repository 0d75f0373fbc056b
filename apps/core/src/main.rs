//! review-sentiment CLI
//!
//! ```bash
//! # Score a review with the built-in rules
//! review-sentiment score "El empaque es terrible, no la volveré a comprar"
//!
//! # Custom rules, JSON output
//! review-sentiment --config rules.toml score --format json "Excelente base"
//!
//! # A file of reviews: JSON array or one review per line
//! review-sentiment --preset lenient batch --input reviews.txt
//!
//! # Validate a rule file
//! SENTIMENT_CONFIG=rules.toml review-sentiment check-config
//! ```
//!
//! Rules come from `--config`, else `--preset`, else `$SENTIMENT_CONFIG`,
//! else the `original` preset.
//!
//! Exit codes: 0 success, 1 other error, 2 configuration error,
//! 3 some input item was rejected.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, warn};

use review_sentiment::telemetry::{init_tracing, LogFormat};
use review_sentiment::{
    ConfigError, LabelDistribution, Polarity, Preset, SentimentAnalyzer, SentimentConfig,
    SentimentError, SentimentReport,
};

#[derive(Parser)]
#[command(name = "review-sentiment")]
#[command(version)]
#[command(about = "Rule-based sentiment scoring for consumer reviews", long_about = None)]
struct Cli {
    /// Rule configuration file (TOML). Falls back to $SENTIMENT_CONFIG
    /// unless --preset is given.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in rule set: original, symmetric or lenient
    #[arg(short, long, global = true)]
    preset: Option<Preset>,

    /// Log format: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one or more texts (stdin when none given)
    Score {
        texts: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Score every review in a file
    Batch {
        /// `.json` array of strings, or one review per line
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Validate the configuration and print its rule counts
    CheckConfig,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Failure classes mapped to exit codes
#[derive(Debug)]
enum Failure {
    Config(ConfigError),
    RejectedInput(usize),
    Other(anyhow::Error),
}

impl From<ConfigError> for Failure {
    fn from(err: ConfigError) -> Self {
        Failure::Config(err)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Other(err)
    }
}

impl Failure {
    fn exit_code(&self) -> u8 {
        match self {
            Failure::Other(_) => 1,
            Failure::Config(_) => 2,
            Failure::RejectedInput(_) => 3,
        }
    }

    fn report(&self) {
        match self {
            Failure::Config(e) => {
                error!("{}", e);
                eprintln!("configuration error: {}", e);
            }
            Failure::RejectedInput(count) => eprintln!("{} input item(s) rejected", count),
            Failure::Other(e) => {
                error!("{:#}", e);
                eprintln!("error: {:#}", e);
            }
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // clap exits 2 on usage errors, which is reserved for configuration errors
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.log_format);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            failure.report();
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let config = resolve_config(cli.config.as_deref(), cli.preset, SentimentConfig::env_path())?;

    match cli.command {
        Commands::CheckConfig => {
            print_config_summary(&config);
            SentimentAnalyzer::from_config(config)?;
            println!("configuration OK");
            Ok(())
        }
        Commands::Score { texts, format } => {
            let analyzer = SentimentAnalyzer::from_config(config)?;
            run_score(&analyzer, texts, io::stdin().lock(), format)
        }
        Commands::Batch { input, format } => {
            let analyzer = SentimentAnalyzer::from_config(config)?;
            run_batch(&analyzer, &input, format)
        }
    }
}

/// Pick the rule set. `--config` and `--preset` exclude each other on the
/// command line; an explicit `--preset` overrides `$SENTIMENT_CONFIG`.
/// With neither, the `original` preset is used.
fn resolve_config(
    cli_path: Option<&Path>,
    preset: Option<Preset>,
    env_path: Option<PathBuf>,
) -> Result<SentimentConfig, Failure> {
    match (cli_path, preset) {
        (Some(_), Some(_)) => Err(Failure::Other(anyhow!(
            "--config and --preset cannot be used together"
        ))),
        (Some(path), None) => Ok(SentimentConfig::from_file(path)?),
        (None, Some(preset)) => Ok(preset.config()?),
        (None, None) => match env_path {
            Some(path) => Ok(SentimentConfig::from_file(path)?),
            None => Ok(Preset::default().config()?),
        },
    }
}

/// Score the given texts, or the whole of `stdin` as one text when none are given.
fn run_score(
    analyzer: &SentimentAnalyzer,
    texts: Vec<String>,
    mut stdin: impl Read,
    format: OutputFormat,
) -> Result<(), Failure> {
    let reports = if texts.is_empty() {
        let mut buffer = Vec::new();
        stdin
            .read_to_end(&mut buffer)
            .context("Failed to read stdin")?;
        match analyzer.analyze_bytes(&buffer) {
            Ok(report) => vec![report],
            Err(SentimentError::InvalidInput(reason)) => {
                warn!(%reason, "Rejected stdin");
                eprintln!("stdin: {}", reason);
                return Err(Failure::RejectedInput(1));
            }
            Err(SentimentError::Config(e)) => return Err(Failure::Config(e)),
        }
    } else {
        analyzer.analyze_batch(&texts)
    };

    match format {
        OutputFormat::Text => reports.iter().for_each(print_report),
        OutputFormat::Json => print_json(&json!(reports))?,
    }
    Ok(())
}

fn run_batch(analyzer: &SentimentAnalyzer, input: &Path, format: OutputFormat) -> Result<(), Failure> {
    let values = read_batch(input)?;
    let results = analyzer.analyze_values(&values);

    let reports: Vec<&SentimentReport> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let distribution = LabelDistribution::from_reports(reports.iter().copied());
    let rejected = results.len() - reports.len();

    match format {
        OutputFormat::Text => {
            for (index, result) in results.iter().enumerate() {
                match result {
                    Ok(report) => print_report(report),
                    Err(e) => println!("#{}: {}", index, e),
                }
            }
            print_distribution(&distribution);
        }
        OutputFormat::Json => {
            let items: Vec<Value> = results
                .iter()
                .map(|r| match r {
                    Ok(report) => json!({ "ok": report }),
                    Err(e) => json!({ "error": e.to_string() }),
                })
                .collect();
            print_json(&json!({ "results": items, "distribution": distribution }))?;
        }
    }

    if rejected > 0 {
        return Err(Failure::RejectedInput(rejected));
    }
    Ok(())
}

fn read_batch(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        let values: Vec<Value> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array", path.display()))?;
        return Ok(values);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Value::String(line.to_string()))
        .collect())
}

fn print_report(report: &SentimentReport) {
    println!(
        "{} (magnitude {}, total {}): {}",
        report.label.display_name(),
        report.magnitude,
        report.total,
        report.text
    );
    for expr in &report.matched_expressions {
        println!("    expression  {:+}  {}", expr.delta, expr.pattern);
    }
    for term in &report.matched_terms {
        println!("    term        {:+}  {}", term.contribution(), term.surface_form);
    }
}

fn print_distribution(distribution: &LabelDistribution) {
    println!("---");
    for (label, count) in distribution.ranked() {
        println!(
            "{:<9} {:>4}  ({:.0}%)",
            label.display_name(),
            count,
            distribution.share(label) * 100.0
        );
    }
    println!("{:<9} {:>4}", "Total", distribution.total());
}

fn print_config_summary(config: &SentimentConfig) {
    println!(
        "thresholds: positive_min = {}, negative_max = {}",
        config.thresholds.positive_min, config.thresholds.negative_max
    );
    println!(
        "lexicon: {} positive, {} negative",
        config.term_count(Polarity::Positive),
        config.term_count(Polarity::Negative)
    );
    println!("expressions: {}", config.expressions.len());
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to render JSON")?);
    Ok(())
}
