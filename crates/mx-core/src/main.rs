//! mx - random mixture evaluator
//!
//! Reads a mixture description (JSON or TOML) and evaluates its density,
//! distribution function, interval probabilities or quantiles. Results go
//! to stdout as JSON (or plain text); logs and errors go to stderr.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use mx_config::load_config;
use mx_core::exit_codes::ExitCode;
use mx_core::logging::{event_names, init_logging, LogConfig, LogLevel, Stage};
use mx_core::{Error, Estimate, MixtureDescription, RandomMixture, Result};
use serde::Serialize;
use tracing::info;

/// Evaluate weighted sums of independent random variables
#[derive(Parser)]
#[command(name = "mx")]
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
    /// Path to a tunables file (JSON or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the mixture: moments, range, bandwidth and atoms
    Describe(DescribeArgs),

    /// Evaluate the density
    Pdf(PdfArgs),

    /// Evaluate the distribution function
    Cdf(CdfArgs),

    /// Evaluate quantiles
    Quantile(QuantileArgs),

    /// Probability of a closed interval
    Probability(ProbabilityArgs),
}

#[derive(Args, Debug)]
struct DescribeArgs {
    /// Mixture description file
    description: PathBuf,
}

#[derive(Args, Debug)]
struct PdfArgs {
    /// Mixture description file
    description: PathBuf,

    /// Evaluation points
    #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true)]
    at: Vec<f64>,
}

#[derive(Args, Debug)]
struct CdfArgs {
    /// Mixture description file
    description: PathBuf,

    /// Evaluation points
    #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true)]
    at: Vec<f64>,

    /// Evaluate P(Y >= x) instead of P(Y <= x)
    #[arg(long)]
    complementary: bool,
}

#[derive(Args, Debug)]
struct QuantileArgs {
    /// Mixture description file
    description: PathBuf,

    /// Probability levels
    #[arg(long = "p", num_args = 1.., required = true, allow_negative_numbers = true)]
    p: Vec<f64>,

    /// Solve P(Y > y) = p instead of P(Y <= y) = p
    #[arg(long)]
    tail: bool,
}

#[derive(Args, Debug)]
struct ProbabilityArgs {
    /// Mixture description file
    description: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    lower: f64,

    #[arg(long, allow_negative_numbers = true)]
    upper: f64,
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Serialize)]
struct Summary {
    constant: f64,
    mean: f64,
    variance: f64,
    std_dev: f64,
    range: [f64; 2],
    position: f64,
    dispersion: f64,
    alpha: f64,
    beta: f64,
    bandwidth: f64,
    large: bool,
    atoms: Vec<AtomSummary>,
}

#[derive(Serialize)]
struct AtomSummary {
    family: &'static str,
    weight: f64,
    mean: f64,
    variance: f64,
}

#[derive(Serialize)]
struct PointValue {
    x: f64,
    value: f64,
    error: f64,
}

#[derive(Serialize)]
struct QuantileValue {
    p: f64,
    quantile: f64,
}

#[derive(Serialize)]
struct Payload<T: Serialize> {
    command: &'static str,
    config_source: String,
    results: T,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let cli_level = (cli.global.verbose > 0 || cli.global.quiet)
        .then(|| LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet));
    init_logging(&LogConfig::from_env(cli_level, None));

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = ExitCode::from(&err);
            let body = serde_json::json!({
                "error": err.to_json(),
                "exit_code": code.code_name(),
            });
            eprintln!("{body}");
            code
        }
    };
    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Describe(args) => run_describe(&cli.global, args),
        Commands::Pdf(args) => run_pdf(&cli.global, args),
        Commands::Cdf(args) => run_cdf(&cli.global, args),
        Commands::Quantile(args) => run_quantile(&cli.global, args),
        Commands::Probability(args) => run_probability(&cli.global, args),
    }
}

/// Load the tunables and the description, and build the mixture.
fn load_mixture(global: &GlobalOpts, description: &Path) -> Result<(RandomMixture, String)> {
    let (config, source) = load_config(global.config.as_deref())?;
    info!(
        event = event_names::CONFIG_LOADED,
        stage = %Stage::Build,
        source = %source,
        "tunables loaded"
    );
    let desc = MixtureDescription::from_file(description)?;
    info!(
        event = event_names::DESCRIPTION_LOADED,
        stage = %Stage::Build,
        path = %description.display(),
        atoms = desc.atoms.len(),
        "mixture description loaded"
    );
    Ok((desc.build(&config)?, source.to_string()))
}

fn emit<T: Serialize>(global: &GlobalOpts, payload: &Payload<T>, text: impl FnOnce()) -> Result<()> {
    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(payload)?),
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn run_describe(global: &GlobalOpts, args: &DescribeArgs) -> Result<()> {
    let (mixture, config_source) = load_mixture(global, &args.description)?;
    let range = mixture.range();
    let summary = Summary {
        constant: mixture.constant(),
        mean: mixture.mean(),
        variance: mixture.variance(),
        std_dev: mixture.std_dev(),
        range: [range.lower, range.upper],
        position: mixture.position_indicator(),
        dispersion: mixture.dispersion_indicator(),
        alpha: mixture.alpha(),
        beta: mixture.beta(),
        bandwidth: mixture.reference_bandwidth(),
        large: mixture.is_large(),
        atoms: mixture
            .atoms()
            .iter()
            .zip(mixture.weights())
            .map(|(atom, &weight)| {
                let d = atom.as_distribution();
                AtomSummary {
                    family: d.name(),
                    weight,
                    mean: d.mean(),
                    variance: d.variance(),
                }
            })
            .collect(),
    };
    let payload = Payload {
        command: "describe",
        config_source,
        results: summary,
    };
    emit(global, &payload, || {
        let s = &payload.results;
        println!("constant\t{}", s.constant);
        println!("mean\t{}", s.mean);
        println!("variance\t{}", s.variance);
        println!("range\t[{}, {}]", s.range[0], s.range[1]);
        println!("beta\t{}", s.beta);
        println!("bandwidth\t{}", s.bandwidth);
        for atom in &s.atoms {
            println!("atom\t{}\t{}", atom.family, atom.weight);
        }
    })
}

fn point_values(points: &[f64], eval: impl Fn(f64) -> Estimate) -> Vec<PointValue> {
    points
        .iter()
        .map(|&x| {
            let e = eval(x);
            PointValue {
                x,
                value: e.value,
                error: e.error,
            }
        })
        .collect()
}

fn print_points(values: &[PointValue]) {
    for v in values {
        println!("{}\t{}", v.x, v.value);
    }
}

fn run_pdf(global: &GlobalOpts, args: &PdfArgs) -> Result<()> {
    let (mixture, config_source) = load_mixture(global, &args.description)?;
    let payload = Payload {
        command: "pdf",
        config_source,
        results: point_values(&args.at, |x| mixture.pdf_estimate(x)),
    };
    emit(global, &payload, || print_points(&payload.results))
}

fn run_cdf(global: &GlobalOpts, args: &CdfArgs) -> Result<()> {
    let (mixture, config_source) = load_mixture(global, &args.description)?;
    let results = point_values(&args.at, |x| {
        if args.complementary {
            mixture.probability_estimate(x, f64::INFINITY, true, false)
        } else {
            mixture.probability_estimate(f64::NEG_INFINITY, x, false, true)
        }
    });
    let payload = Payload {
        command: if args.complementary { "ccdf" } else { "cdf" },
        config_source,
        results,
    };
    emit(global, &payload, || print_points(&payload.results))
}

fn run_quantile(global: &GlobalOpts, args: &QuantileArgs) -> Result<()> {
    let (mixture, config_source) = load_mixture(global, &args.description)?;
    let results = args
        .p
        .iter()
        .map(|&p| {
            Ok(QuantileValue {
                p,
                quantile: mixture.quantile(p, args.tail)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let payload = Payload {
        command: "quantile",
        config_source,
        results,
    };
    emit(global, &payload, || {
        for q in &payload.results {
            println!("{}\t{}", q.p, q.quantile);
        }
    })
}

fn run_probability(global: &GlobalOpts, args: &ProbabilityArgs) -> Result<()> {
    if args.lower.is_nan() || args.upper.is_nan() {
        return Err(Error::InvalidArgument("interval bounds must not be NaN".to_string()));
    }
    let (mixture, config_source) = load_mixture(global, &args.description)?;
    let payload = Payload {
        command: "probability",
        config_source,
        results: mixture.probability_estimate(args.lower, args.upper, true, true),
    };
    emit(global, &payload, || println!("{}", payload.results.value))
}
