use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canary_bisect::git::{self, Checkout, CheckoutConfig};
use canary_bisect::oracle::{Guarded, OracleConfig, ScriptOracle};
use canary_bisect::report::{BisectReport, format_json, format_summary};
use canary_bisect::search::least_satisfying;
use canary_bisect::types::Reference;

/// Exit code when untestable canaries leave several suspects.
const EXIT_AMBIGUOUS: u8 = 2;

/// Bisect toolchain canary builds to find where a script's behavior changed.
///
/// The script must exit 0 on the old behavior, 125 when the candidate cannot
/// be tested, and anything else on the new behavior.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Last known good reference: a version (`1.40.0`) or a canary hash.
    #[arg(long)]
    from: Reference,

    /// First known bad reference: a version (`1.41.0`) or a canary hash.
    #[arg(long)]
    to: Reference,

    /// Existing checkout to use instead of cloning the upstream.
    #[arg(long)]
    checkout: Option<PathBuf>,

    /// Upstream repository to clone [env: CANARY_BISECT_UPSTREAM].
    #[arg(long)]
    upstream: Option<String>,

    /// Toolchain binary used to install canaries and run the script
    /// [env: CANARY_BISECT_TOOL].
    #[arg(long)]
    tool: Option<String>,

    /// Script exit code meaning "cannot test this candidate"
    /// [env: CANARY_BISECT_SKIP_EXIT_CODE].
    #[arg(long)]
    skip_exit_code: Option<i32>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Test script to run against each canary.
    script: PathBuf,
}

impl Cli {
    /// Environment defaults from `lookup`, overridden by any flags given.
    fn checkout_config(&self, lookup: impl Fn(&str) -> Option<String>) -> CheckoutConfig {
        let mut config = CheckoutConfig::from_lookup(lookup);
        if let Some(upstream) = &self.upstream {
            config.upstream = upstream.clone();
        }
        config.path = self.checkout.clone();
        config
    }

    /// Environment defaults from `lookup`, overridden by any flags given.
    fn oracle_config(&self, lookup: impl Fn(&str) -> Option<String>) -> OracleConfig {
        let mut config = OracleConfig::from_lookup(lookup);
        if let Some(tool) = &self.tool {
            config.tool = tool.clone();
        }
        if let Some(code) = self.skip_exit_code {
            config.skip_exit_code = code;
        }
        config
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Process exit status for a finished bisection.
fn exit_status(report: &BisectReport) -> u8 {
    if report.is_confirmed() {
        0
    } else {
        EXIT_AMBIGUOUS
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canary_bisect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let script = cli
        .script
        .canonicalize()
        .with_context(|| format!("test script {} not found", cli.script.display()))?;

    let checkout = Checkout::prepare(&cli.checkout_config(env_lookup))
        .context("failed to prepare checkout")?;
    let workdir = checkout.path();

    let history = git::history(workdir).context("failed to read history")?;
    let from = git::resolve(workdir, &history, &cli.from)?;
    let to = git::resolve(workdir, &history, &cli.to)?;
    tracing::info!(from = %from, to = %to, "resolved endpoints");

    let candidates = git::candidates_between(workdir, &from, &to)?;
    tracing::info!(count = candidates.len(), "bisecting candidates");

    let mut oracle = Guarded::new(ScriptOracle::new(cli.oracle_config(env_lookup), script));
    let bisection = least_satisfying(&candidates, &mut oracle).await?;

    let report = BisectReport::new(&cli.from, &cli.to, &candidates, &bisection);
    if cli.json {
        println!("{}", format_json(&report)?);
    } else {
        println!("{}", format_summary(&report));
    }

    Ok(ExitCode::from(exit_status(&report)))
}
