//! BrInvest CLI — run the market and investor-profile pipeline.
//!
//! With no flags the fixed layout is used: inputs under `data/`, artifacts
//! under `output/`. `--config` points at a TOML file overriding any of them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use brinvest_runner::{run_pipeline, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "brinvest",
    version,
    about = "BrInvest CLI — Brazilian investor growth dashboards and reports"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to the built-in paths.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    debug!(?config, "pipeline configuration");

    let report = run_pipeline(&config)?;

    println!();
    println!("PROCESSO FINALIZADO COM SUCESSO!");
    println!(
        "Verifique os arquivos gerados na pasta '{}':",
        config.outputs.dir.display()
    );
    for path in report.artifacts() {
        println!("  {}", path.display());
    }
    for (flow, outcome) in [("Mercado", &report.market), ("Perfil", &report.profile)] {
        if let Some(reason) = &outcome.skipped {
            println!("Fluxo {flow} ignorado: {reason}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_uses_defaults() {
        let cli = Cli::try_parse_from(["brinvest"]).unwrap();
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_flag_takes_a_path() {
        let cli = Cli::try_parse_from(["brinvest", "--config", "brinvest.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("brinvest.toml")));
    }

    #[test]
    fn test_unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["brinvest", "--verbose"]).is_err());
    }
}
