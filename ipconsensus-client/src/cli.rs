use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ipconsensus_shared::report::{ConsensusReport, EndpointReport};

use crate::config::Config;
use crate::consensus::{ConsensusError, Resolver};
use crate::util::format::format_report;
use crate::util::logging::init_tracing;
use crate::util::shutdown::SHUTDOWN;

/// Find your public IP address by asking several services and trusting only agreement
#[derive(Parser)]
#[command(name = "ipconsensus")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the public address at least two endpoints agree on
    Get(LookupArgs),

    /// Query every endpoint and show what each one answered
    Probe(LookupArgs),

    /// List the configured endpoints
    Endpoints,

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    Version,
}

#[derive(Args, Debug, Default)]
struct LookupArgs {
    /// Endpoint to query instead of the configured list (repeatable)
    #[arg(short, long = "endpoint")]
    endpoints: Vec<String>,

    /// Per-endpoint request timeout in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Print machine readable JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Remove the config file
    Clear,
}

pub async fn cli() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Get(args) => get(&config, &args).await?,
        Commands::Probe(args) => probe(&config, &args).await?,
        Commands::Endpoints => {
            for endpoint in &config.consensus.endpoints {
                println!("{endpoint}");
            }
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Init { force } => {
                let path = Config::config_file_path()?;
                if path.exists() && !force {
                    bail!("Config file already exists at {:?} (use --force to overwrite)", path);
                }
                let path = config.save()?;
                println!("Wrote {}", path.display());
            }
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Clear => {
                if Config::clear()? {
                    println!("Config file removed");
                } else {
                    println!("No config file to remove");
                }
            }
        },
        Commands::Version => {
            println!("ipconsensus version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn resolver_for(config: &Config, args: &LookupArgs) -> Result<Resolver> {
    let mut consensus = config.consensus.clone();
    if !args.endpoints.is_empty() {
        consensus = consensus.with_endpoints(args.endpoints.iter().cloned());
    }
    if let Some(ms) = args.timeout_ms {
        consensus = consensus.with_timeout(Duration::from_millis(ms));
    }

    let resolver = Resolver::new(consensus).context("Failed to build HTTP client")?;
    Ok(resolver.with_shutdown(SHUTDOWN.clone()))
}

async fn get(config: &Config, args: &LookupArgs) -> Result<()> {
    let resolver = resolver_for(config, args)?;

    match resolver.get().await {
        Ok(ip) => {
            if args.json {
                let report = ConsensusReport::Agreed {
                    address: ip.to_string(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{ip}");
            }
            Ok(())
        }
        Err(ConsensusError::NoConsensus(failure)) if args.json => {
            let report = ConsensusReport::NoConsensus {
                endpoints: failure.reports(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            bail!("No two endpoints agreed on an address")
        }
        Err(e) => Err(e).context("Failed to determine public address"),
    }
}

async fn probe(config: &Config, args: &LookupArgs) -> Result<()> {
    let resolver = resolver_for(config, args)?;
    let endpoints = &resolver.config().endpoints;
    if endpoints.is_empty() {
        bail!("No endpoints configured");
    }

    let reports: Vec<EndpointReport> = resolver
        .probe(endpoints)
        .await
        .iter()
        .map(|record| record.to_report())
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let ansi = std::io::stdout().is_terminal();
        for report in &reports {
            println!("{}", format_report(report, ansi));
        }
    }

    if !reports.iter().any(EndpointReport::is_ok) {
        bail!("None of the {} endpoints returned an address", reports.len());
    }
    Ok(())
}
