//! dp-decisions CLI
//!
//! The main entry point for dpd, handling:
//! - Beta fits of campaign conversion rates and implied distributions
//! - Differential-privacy decision simulations and sweeps
//! - Privacy-bound and convergence illustrations
//! - Configuration inspection, validation and JSON Schemas

use clap::{Args, Parser, Subcommand};
use dpd_common::{Error, OutputFormat, Result};
use dpd_config::{
    get_preset, list_presets, validate::validate_analysis, validate::validate_privacy_bound,
    validate::validate_scenario, Config, ConfigPath, ExponentRange, PresetName, ValidationError,
};
use dpd_core::dataset::{read_campaign_counts_file, read_impressions_file, DatasetOptions};
use dpd_core::exit_codes::ExitCode;
use dpd_core::logging::{event_names, generate_run_id, init_logging, run_span, LogConfig, LogLevel};
use dpd_core::output::{render, report_error, CommandOutput};
use dpd_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use dpd_core::series::{
    convergence_illustration, format_sig, implied_pdf_series, laplace_curves,
    prob_correct_by_epsilon, sweep_series,
};
use dpd_core::{aggregate_campaigns, derive_implied, estimate_beta_parameters, run_sweep};
use dpd_math::BetaParams;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::fmt::Write as _;
use std::path::PathBuf;

/// dp-decisions - conversion-rate fitting and differential-privacy decision simulation
#[derive(Parser)]
#[command(name = "dpd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// RNG seed for stochastic commands (overrides the configured seed)
    #[arg(long, global = true, env = "DPD_SEED")]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit a Beta distribution to campaign conversion rates and derive implied distributions
    Fit(FitArgs),

    /// Derive implied distributions from known Beta parameters
    Implied(ImpliedArgs),

    /// Simulate how Laplace noise changes threshold decisions
    Simulate(SimulateArgs),

    /// Laplace privacy-bound illustrations
    PrivacyBound(PrivacyBoundArgs),

    /// Repeated-sampling convergence illustration
    Convergence(ConvergenceArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// JSON Schemas for configuration file types
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct FitArgs {
    /// Impression-level dataset (tab- or comma-separated, with header)
    #[arg(long)]
    data: PathBuf,

    /// Treat the dataset as pre-aggregated campaign,impressions,conversions rows
    #[arg(long)]
    counts: bool,

    /// Target means for implied distributions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    means: Option<Vec<f64>>,

    /// Campaign identifier column
    #[arg(long)]
    campaign_column: Option<String>,

    /// Conversion flag column
    #[arg(long)]
    conversion_column: Option<String>,

    /// Points on each PDF series
    #[arg(long)]
    points: Option<usize>,
}

#[derive(Args, Debug)]
struct ImpliedArgs {
    /// Fitted alpha
    #[arg(long)]
    alpha: f64,

    /// Fitted beta
    #[arg(long)]
    beta: f64,

    /// Target means (comma-separated)
    #[arg(long, value_delimiter = ',')]
    means: Option<Vec<f64>>,

    /// Points on each PDF series
    #[arg(long)]
    points: Option<usize>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Named scenario (median, various-rules, various-rules-limited-n, maintain, maintain-various-rules)
    #[arg(long)]
    preset: Option<PresetName>,

    /// Trials per (N, rule, ε)
    #[arg(long)]
    trials: Option<u64>,

    /// First N exponent (N = 10^x)
    #[arg(long)]
    exp_start: Option<u32>,

    /// Exponent end, exclusive
    #[arg(long)]
    exp_end: Option<u32>,
}

#[derive(Args, Debug)]
struct PrivacyBoundArgs {
    #[command(subcommand)]
    command: PrivacyBoundCommands,
}

#[derive(Subcommand, Debug)]
enum PrivacyBoundCommands {
    /// Two Laplace densities, their overlap and P(incorrect)
    Curves(CurvesArgs),

    /// P(correct individual decision) across ε = 2^x
    Prob(ProbArgs),
}

#[derive(Args, Debug)]
struct CurvesArgs {
    /// First location
    #[arg(long, allow_hyphen_values = true)]
    mu0: Option<f64>,

    /// Second location
    #[arg(long, allow_hyphen_values = true)]
    mu1: Option<f64>,

    /// Privacy budget
    #[arg(long)]
    epsilon: Option<f64>,

    /// Grid points
    #[arg(long)]
    points: Option<usize>,
}

#[derive(Args, Debug)]
struct ProbArgs {
    /// First location
    #[arg(long, allow_hyphen_values = true)]
    mu0: Option<f64>,

    /// Second location
    #[arg(long, allow_hyphen_values = true)]
    mu1: Option<f64>,

    /// First ε exponent (ε = 2^x)
    #[arg(long, allow_hyphen_values = true)]
    eps_exp_start: Option<i32>,

    /// ε exponent end, exclusive
    #[arg(long, allow_hyphen_values = true)]
    eps_exp_end: Option<i32>,
}

#[derive(Args, Debug)]
struct ConvergenceArgs {
    /// Generating alpha
    #[arg(long)]
    alpha: f64,

    /// Generating beta
    #[arg(long)]
    beta: f64,

    /// Impressions per simulated campaign
    #[arg(long, default_value_t = 1000)]
    impressions: u64,

    /// Simulated campaigns
    #[arg(long, default_value_t = 10_000)]
    rounds: usize,

    /// Histogram bins over [0, 1]
    #[arg(long, default_value_t = 100)]
    bins: usize,

    /// Points on each PDF series
    #[arg(long)]
    points: Option<usize>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show,

    /// Validate a configuration file (defaults to the resolved one)
    Validate {
        /// Path to the file to validate
        path: Option<PathBuf>,
    },

    /// List simulation presets
    Presets,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type to generate a schema for
    name: Option<String>,

    /// List available schema types
    #[arg(long, conflicts_with = "all")]
    list: bool,

    /// Generate every schema
    #[arg(long)]
    all: bool,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Fit(_) => "fit",
            Commands::Implied(_) => "implied",
            Commands::Simulate(_) => "simulate",
            Commands::PrivacyBound(args) => match args.command {
                PrivacyBoundCommands::Curves(_) => "privacy-bound curves",
                PrivacyBoundCommands::Prob(_) => "privacy-bound prob",
            },
            Commands::Convergence(_) => "convergence",
            Commands::Config(args) => match args.command {
                ConfigCommands::Show => "config show",
                ConfigCommands::Validate { .. } => "config validate",
                ConfigCommands::Presets => "config presets",
            },
            Commands::Schema(_) => "schema",
            Commands::Version => "version",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(cli_level));

    let run_id = generate_run_id();
    let command = cli.command.name();
    let span = run_span(&run_id, command);
    let _guard = span.enter();
    tracing::info!(target: event_names::RUN_STARTED, "starting {}", command);

    let result = match &cli.command {
        Commands::Fit(args) => run_fit(&cli.global, args),
        Commands::Implied(args) => run_implied(&cli.global, args),
        Commands::Simulate(args) => run_simulate(&cli.global, args),
        Commands::PrivacyBound(args) => match &args.command {
            PrivacyBoundCommands::Curves(args) => run_privacy_curves(&cli.global, args),
            PrivacyBoundCommands::Prob(args) => run_privacy_prob(&cli.global, args),
        },
        Commands::Convergence(args) => run_convergence(&cli.global, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
            ConfigCommands::Validate { path } => run_config_validate(&cli.global, path.as_ref()),
            ConfigCommands::Presets => Ok(run_config_presets()),
        },
        Commands::Schema(args) => run_schema(args),
        Commands::Version => Ok(print_version()),
    };

    let exit_code = match result {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            match render(&mut stdout, cli.global.format, &run_id, &output) {
                Ok(()) => output.exit,
                Err(e) => {
                    let err = Error::Io(e);
                    report_error(cli.global.format, &run_id, command, &err);
                    ExitCode::from(&err)
                }
            }
        }
        Err(err) => {
            tracing::error!(code = err.code(), "{}", err);
            report_error(cli.global.format, &run_id, command, &err);
            ExitCode::from(&err)
        }
    };

    tracing::info!(
        target: event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        "finished {}",
        command
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load_config(global: &GlobalOpts) -> Result<(Config, ConfigPath)> {
    let (config, resolved) = Config::load_resolved(global.config.as_deref())
        .map_err(|e| Error::Config(e.to_string()))?;
    tracing::debug!(source = %resolved.source, "configuration resolved");
    Ok((config, resolved))
}

/// Command-line overrides that fail validation are argument errors.
fn argument_error(err: ValidationError) -> Error {
    let field = err.field().unwrap_or("arguments").to_string();
    Error::precondition(field, err.to_string())
}

/// Seeded RNG plus the seed actually used, so runs can be replayed.
fn seeded_rng(cli_seed: Option<u64>, configured: Option<u64>) -> (StdRng, u64) {
    let seed = cli_seed.or(configured).unwrap_or_else(rand::random);
    (StdRng::seed_from_u64(seed), seed)
}

fn beta_params(alpha: f64, beta: f64) -> Result<BetaParams> {
    BetaParams::new(alpha, beta).ok_or_else(|| {
        if alpha.is_finite() && alpha > 0.0 {
            Error::precondition("beta", format!("must be finite and > 0, got {}", beta))
        } else {
            Error::precondition("alpha", format!("must be finite and > 0, got {}", alpha))
        }
    })
}

fn implied_output(
    command: &'static str,
    fitted_line: String,
    derivation: &dpd_core::ImpliedDerivation,
    points: usize,
    mut body: serde_json::Value,
) -> CommandOutput {
    let series = implied_pdf_series(derivation, points);
    body["implied"] = json!(derivation);
    body["series"] = json!(series);

    let mut md = String::new();
    let _ = writeln!(md, "# Implied Beta Distributions\n");
    let _ = writeln!(md, "{}\n", fitted_line);
    let _ = writeln!(md, "Fitted variance: {}\n", format_sig(derivation.variance, 4));
    let _ = writeln!(md, "| Mean | α | β | Status |");
    let _ = writeln!(md, "|------|---|---|--------|");
    for target in &derivation.derived {
        let _ = writeln!(
            md,
            "| {} | {} | {} | ok |",
            target.mean,
            format_sig(target.alpha, 3),
            format_sig(target.beta, 3)
        );
    }
    for skip in &derivation.skipped {
        let _ = writeln!(md, "| {} | - | - | skipped: {} |", skip.mean, skip.reason);
    }

    let exit = if derivation.is_complete() {
        ExitCode::Clean
    } else {
        ExitCode::Partial
    };
    CommandOutput::new(command, body)
        .with_summary(format!(
            "{}; {} implied, {} skipped",
            fitted_line,
            derivation.derived.len(),
            derivation.skipped.len()
        ))
        .with_markdown(md)
        .with_exit(exit)
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_fit(global: &GlobalOpts, args: &FitArgs) -> Result<CommandOutput> {
    let (config, _) = load_config(global)?;
    let mut analysis = config.analysis.clone();
    if let Some(means) = &args.means {
        analysis.target_means = means.clone();
    }
    if let Some(column) = &args.campaign_column {
        analysis.campaign_column = column.clone();
    }
    if let Some(column) = &args.conversion_column {
        analysis.conversion_column = column.clone();
    }
    if let Some(points) = args.points {
        analysis.pdf_points = points;
    }
    validate_analysis(&analysis).map_err(argument_error)?;

    let aggregates = if args.counts {
        read_campaign_counts_file(&args.data, &analysis.campaign_column)?
    } else {
        let options = DatasetOptions {
            campaign_column: analysis.campaign_column.clone(),
            conversion_column: analysis.conversion_column.clone(),
        };
        let records = read_impressions_file(&args.data, &options)?;
        tracing::info!(records = records.len(), "dataset loaded");
        aggregate_campaigns(&records)
    };

    let estimate = estimate_beta_parameters(&aggregates)?;
    let derivation = derive_implied(&estimate.params, &analysis.target_means);
    let fitted_line = format!(
        "Beta({}, {}) from {} of {} campaigns",
        format_sig(estimate.params.alpha, 3),
        format_sig(estimate.params.beta, 3),
        estimate.fitted_campaigns,
        estimate.campaigns
    );
    let body = json!({
        "dataset": args.data.display().to_string(),
        "estimate": estimate,
    });
    Ok(implied_output(
        "fit",
        fitted_line,
        &derivation,
        analysis.pdf_points,
        body,
    ))
}

fn run_implied(global: &GlobalOpts, args: &ImpliedArgs) -> Result<CommandOutput> {
    let (config, _) = load_config(global)?;
    let params = beta_params(args.alpha, args.beta)?;
    let mut analysis = config.analysis.clone();
    if let Some(means) = &args.means {
        analysis.target_means = means.clone();
    }
    if let Some(points) = args.points {
        analysis.pdf_points = points;
    }
    validate_analysis(&analysis).map_err(argument_error)?;

    let derivation = derive_implied(&params, &analysis.target_means);
    let fitted_line = format!(
        "Beta({}, {})",
        format_sig(params.alpha, 3),
        format_sig(params.beta, 3)
    );
    Ok(implied_output(
        "implied",
        fitted_line,
        &derivation,
        analysis.pdf_points,
        json!({}),
    ))
}

fn run_simulate(global: &GlobalOpts, args: &SimulateArgs) -> Result<CommandOutput> {
    let (config, _) = load_config(global)?;
    let mut scenario = match args.preset {
        Some(name) => get_preset(name),
        None => config.simulation.clone(),
    };
    if let Some(trials) = args.trials {
        scenario.trials = trials;
    }
    if args.exp_start.is_some() || args.exp_end.is_some() {
        scenario.n_exponents = ExponentRange::new(
            args.exp_start.unwrap_or(scenario.n_exponents.start),
            args.exp_end.unwrap_or(scenario.n_exponents.end),
        );
    }
    validate_scenario(&scenario).map_err(argument_error)?;

    let (mut rng, seed) = seeded_rng(global.seed, scenario.seed);
    tracing::info!(
        seed,
        title = %scenario.title,
        rules = scenario.rules.len(),
        trials = scenario.trials,
        "running sweep"
    );
    let result = run_sweep(&scenario, &mut rng)?;
    let series = sweep_series(&result);

    let mut md = String::new();
    let _ = writeln!(md, "# {}\n", result.title);
    let _ = writeln!(
        md,
        "Beta({}, {}), sensitivity {}, {} trials, seed {}\n",
        format_sig(result.alpha, 3),
        format_sig(result.beta, 3),
        result.sensitivity,
        result.trials,
        seed
    );
    let _ = writeln!(md, "| Curve | Thresholds | min P(same) | max P(same) |");
    let _ = writeln!(md, "|-------|------------|-------------|-------------|");
    for curve in &result.curves {
        let min = curve.match_probability.iter().copied().fold(f64::INFINITY, f64::min);
        let max = curve.match_probability.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let thresholds: Vec<String> = curve.thresholds.iter().map(|t| t.to_string()).collect();
        let _ = writeln!(
            md,
            "| {} | {} | {:.4} | {:.4} |",
            curve.label,
            thresholds.join(" / "),
            min,
            max
        );
    }

    let summary = format!("{}: {} curves, seed {}", result.title, result.curves.len(), seed);
    let body = json!({
        "seed": seed,
        "scenario": scenario,
        "sweep": result,
        "series": series,
    });
    Ok(CommandOutput::new("simulate", body)
        .with_summary(summary)
        .with_markdown(md))
}

fn run_privacy_curves(global: &GlobalOpts, args: &CurvesArgs) -> Result<CommandOutput> {
    let (config, _) = load_config(global)?;
    let mut bound = config.privacy_bound.clone();
    if let Some(mu0) = args.mu0 {
        bound.mu[0] = mu0;
    }
    if let Some(mu1) = args.mu1 {
        bound.mu[1] = mu1;
    }
    if let Some(epsilon) = args.epsilon {
        bound.epsilon = epsilon;
    }
    if let Some(points) = args.points {
        bound.points = points;
    }
    validate_privacy_bound(&bound).map_err(argument_error)?;

    let curves = laplace_curves(bound.mu, bound.epsilon, bound.points);
    let summary = format!(
        "mu=({}, {}), epsilon={:.2}, P(incorrect)={:.4}",
        bound.mu[0], bound.mu[1], bound.epsilon, curves.prob_incorrect
    );
    let mut md = String::new();
    let _ = writeln!(md, "# Laplace Distribution\n");
    let _ = writeln!(md, "| μ0 | μ1 | ε | Midpoint | P(incorrect) |");
    let _ = writeln!(md, "|----|----|---|----------|--------------|");
    let _ = writeln!(
        md,
        "| {} | {} | {:.2} | {} | {:.4} |",
        bound.mu[0], bound.mu[1], bound.epsilon, curves.midpoint, curves.prob_incorrect
    );
    Ok(CommandOutput::new("privacy-bound curves", json!({ "curves": curves }))
        .with_summary(summary)
        .with_markdown(md))
}

fn run_privacy_prob(global: &GlobalOpts, args: &ProbArgs) -> Result<CommandOutput> {
    let (config, _) = load_config(global)?;
    let mut bound = config.privacy_bound.clone();
    if let Some(mu0) = args.mu0 {
        bound.mu[0] = mu0;
    }
    if let Some(mu1) = args.mu1 {
        bound.mu[1] = mu1;
    }
    if let Some(start) = args.eps_exp_start {
        bound.eps_exp_start = start;
    }
    if let Some(end) = args.eps_exp_end {
        bound.eps_exp_end = end;
    }
    validate_privacy_bound(&bound).map_err(argument_error)?;

    let series = prob_correct_by_epsilon(bound.mu, bound.eps_exp_start, bound.eps_exp_end);
    let mut md = String::new();
    let _ = writeln!(md, "# Prob of correct individual decision\n");
    let _ = writeln!(md, "| ε | P(correct) |");
    let _ = writeln!(md, "|---|------------|");
    for (eps, p) in series.x.iter().zip(&series.y) {
        let _ = writeln!(md, "| 2^{} | {:.4} |", eps.log2().round(), p);
    }
    let summary = format!(
        "{} budgets from 2^{} to 2^{}",
        series.len(),
        bound.eps_exp_start,
        bound.eps_exp_end - 1
    );
    Ok(CommandOutput::new(
        "privacy-bound prob",
        json!({ "mu": bound.mu, "series": series }),
    )
    .with_summary(summary)
    .with_markdown(md))
}

fn run_convergence(global: &GlobalOpts, args: &ConvergenceArgs) -> Result<CommandOutput> {
    let (config, _) = load_config(global)?;
    let params = beta_params(args.alpha, args.beta)?;
    if args.impressions == 0 {
        return Err(Error::precondition("impressions", "must be >= 1"));
    }
    if args.rounds < 2 {
        return Err(Error::precondition("rounds", "must be >= 2"));
    }
    if args.bins == 0 {
        return Err(Error::precondition("bins", "must be >= 1"));
    }
    let points = args.points.unwrap_or(config.analysis.pdf_points);
    if points < 2 {
        return Err(Error::precondition("points", "must be >= 2"));
    }

    let (mut rng, seed) = seeded_rng(global.seed, config.simulation.seed);
    let illustration = convergence_illustration(
        &params,
        args.impressions,
        args.rounds,
        args.bins,
        points,
        &mut rng,
    )
    .ok_or_else(|| Error::precondition("alpha", "cannot parameterize a Beta distribution"))?;

    let refit = match &illustration.refit {
        Some(p) => format!("Beta({}, {})", format_sig(p.alpha, 3), format_sig(p.beta, 3)),
        None => "unavailable".to_string(),
    };
    let summary = format!(
        "generating Beta({}, {}), re-fitted {}, seed {}",
        format_sig(params.alpha, 3),
        format_sig(params.beta, 3),
        refit,
        seed
    );
    let mut md = String::new();
    let _ = writeln!(md, "# Convergence\n");
    let _ = writeln!(md, "| | Distribution |");
    let _ = writeln!(md, "|-|--------------|");
    let _ = writeln!(
        md,
        "| Generating | Beta({}, {}) |",
        format_sig(params.alpha, 3),
        format_sig(params.beta, 3)
    );
    let _ = writeln!(md, "| Re-fitted | {} |", refit);
    let _ = writeln!(
        md,
        "\n{} campaigns of {} impressions, seed {}",
        args.rounds, args.impressions, seed
    );
    Ok(CommandOutput::new(
        "convergence",
        json!({ "seed": seed, "convergence": illustration }),
    )
    .with_summary(summary)
    .with_markdown(md))
}

fn run_config_show(global: &GlobalOpts) -> Result<CommandOutput> {
    let (config, resolved) = load_config(global)?;
    let path = resolved.path.as_ref().map(|p| p.display().to_string());
    let toml = config.to_toml_string().map_err(Error::Config)?;
    let summary = format!(
        "config from {}{}",
        resolved.source,
        path.as_deref().map(|p| format!(" ({})", p)).unwrap_or_default()
    );
    let md = format!(
        "# Configuration\n\nSource: {}\n\n```toml\n{}```\n",
        resolved.source, toml
    );
    Ok(CommandOutput::new(
        "config show",
        json!({
            "source": resolved.source.to_string(),
            "path": path,
            "config": config,
        }),
    )
    .with_summary(summary)
    .with_markdown(md))
}

fn run_config_validate(global: &GlobalOpts, path: Option<&PathBuf>) -> Result<CommandOutput> {
    let (shown, source) = match path {
        Some(path) => {
            Config::load(path).map_err(|e| Error::Config(e.to_string()))?;
            (Some(path.display().to_string()), "argument".to_string())
        }
        None => {
            let (_, resolved) = load_config(global)?;
            (
                resolved.path.as_ref().map(|p| p.display().to_string()),
                resolved.source.to_string(),
            )
        }
    };
    let label = shown.clone().unwrap_or_else(|| "built-in defaults".to_string());
    Ok(CommandOutput::new(
        "config validate",
        json!({ "valid": true, "path": shown, "source": source }),
    )
    .with_summary(format!("{} is valid", label))
    .with_markdown(format!("# Configuration\n\n{} is valid.\n", label)))
}

fn run_config_presets() -> CommandOutput {
    let presets: Vec<serde_json::Value> = list_presets()
        .into_iter()
        .map(|(name, description)| {
            json!({ "name": name.as_str(), "description": description })
        })
        .collect();
    let mut md = String::new();
    let _ = writeln!(md, "# Presets\n");
    let _ = writeln!(md, "| Name | Description |");
    let _ = writeln!(md, "|------|-------------|");
    for name in PresetName::ALL {
        let _ = writeln!(md, "| {} | {} |", name, name.description());
    }
    CommandOutput::new("config presets", json!({ "presets": presets }))
        .with_summary(format!("{} presets", PresetName::ALL.len()))
        .with_markdown(md)
}

fn run_schema(args: &SchemaArgs) -> Result<CommandOutput> {
    if args.list || (args.name.is_none() && !args.all) {
        let schemas: Vec<serde_json::Value> = available_schemas()
            .into_iter()
            .map(|(name, description)| json!({ "name": name, "description": description }))
            .collect();
        let mut md = String::from("# Schemas\n\n| Type | Description |\n|------|-------------|\n");
        for (name, description) in available_schemas() {
            let _ = writeln!(md, "| {} | {} |", name, description);
        }
        return Ok(CommandOutput::new("schema", json!({ "schemas": schemas }))
            .with_summary(format!("{} schema types", available_schemas().len()))
            .with_markdown(md));
    }

    if args.all {
        let schemas = generate_all_schemas();
        let summary = format!("{} schemas", schemas.len());
        return Ok(CommandOutput::new("schema", json!({ "schemas": schemas }))
            .with_summary(summary.clone())
            .with_markdown(format!("# Schemas\n\n{}\n", summary)));
    }

    let name = args.name.as_deref().unwrap_or("Config");
    let schema = generate_schema(name).ok_or_else(|| {
        let known: Vec<&str> = available_schemas().into_iter().map(|(n, _)| n).collect();
        Error::precondition(
            "name",
            format!("unknown schema type '{}' (available: {})", name, known.join(", ")),
        )
    })?;
    let pretty = serde_json::to_string_pretty(&schema)?;
    Ok(CommandOutput::new("schema", json!({ "type": name, "schema": schema }))
        .with_summary(format!("schema for {}", name))
        .with_markdown(format!("# {}\n\n```json\n{}\n```\n", name, pretty)))
}

fn print_version() -> CommandOutput {
    let version = env!("CARGO_PKG_VERSION");
    CommandOutput::new(
        "version",
        json!({
            "version": version,
            "schema_version": dpd_common::SCHEMA_VERSION,
        }),
    )
    .with_summary(format!("dpd {}", version))
    .with_markdown(format!("dpd {}\n", version))
}
