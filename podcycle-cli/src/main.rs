///! Podcycle CLI
///!
///! Rolling-restart orchestrator for Kubernetes workloads: finds
///! Deployments, StatefulSets, and DaemonSets whose name matches a token
///! and triggers a rollout for each.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use podcycle_core::{K8sClient, KubeWorkloadStore, Reconciler, SystemClock, TokenSelector};
use tokio::sync::watch;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use output::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to kubeconfig (defaults to $KUBECONFIG, then ~/.kube/config)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Use in-cluster service account credentials
    #[arg(long, global = true)]
    in_cluster: bool,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a rolling restart of workloads whose name matches a token
    Restart {
        /// Case-insensitive substring a workload name must contain
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = config::Config::load().unwrap_or_default();

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Restart { token } => {
            let token = token.clone().unwrap_or_else(|| config.default_token.clone());
            let format =
                OutputFormat::from_str(cli.output.as_deref().unwrap_or(&config.default_output));
            run_restart(&cli, &config, &token, format).await
        }
    }
}

async fn run_restart(
    cli: &Cli,
    config: &config::Config,
    token: &str,
    format: OutputFormat,
) -> Result<()> {
    let client = connect(cli, config).await?;
    client.health_check().await?;

    if format == OutputFormat::Table {
        output::print_pass_start(client.api_server(), token);
    }

    let store = KubeWorkloadStore::new(&client);
    let reconciler = Reconciler::new(store, TokenSelector::new(token), SystemClock);

    let shutdown = spawn_signal_handler();
    let observer = output::ProgressPrinter::new(format);

    let report = reconciler.run(&shutdown, &observer).await?;
    output::print_report(&report, token, format)?;

    if !report.fully_successful() {
        std::process::exit(1);
    }

    Ok(())
}

async fn connect(cli: &Cli, config: &config::Config) -> Result<K8sClient> {
    if cli.in_cluster {
        return Ok(K8sClient::from_incluster().await?);
    }

    let context = cli.context.as_deref().or(config.context.as_deref());
    let path = cli
        .kubeconfig
        .clone()
        .or_else(|| config.kubeconfig.as_ref().map(PathBuf::from));

    let client = match path {
        Some(path) => K8sClient::from_kubeconfig_file(&path, context).await?,
        None => K8sClient::from_default_kubeconfig(context).await?,
    };

    Ok(client)
}

/// Flip the shutdown channel on Ctrl-C so the pass stops between workloads
fn spawn_signal_handler() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current workload");
            let _ = tx.send(true);
        }
    });

    rx
}
