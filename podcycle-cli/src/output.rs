///! Output formatting for CLI
///!
///! Progressive per-workload outcome lines plus a final summary, in table,
///! JSON, or YAML form.

use colored::Colorize;
use podcycle_core::{ProgressObserver, RestartReport, WorkloadError, WorkloadRef};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            _ => OutputFormat::Table,
        }
    }
}

/// Prints per-workload outcomes as they happen
///
/// Silent in JSON/YAML mode so stdout stays one machine-readable document.
pub struct ProgressPrinter {
    live: bool,
}

impl ProgressPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            live: format == OutputFormat::Table,
        }
    }
}

impl ProgressObserver for ProgressPrinter {
    fn restarted(&self, workload: &WorkloadRef) {
        if self.live {
            println!(
                "{} restarted {}",
                "✓".green().bold(),
                workload.to_string().green()
            );
        }
    }

    fn failed(&self, workload: &WorkloadRef, error: &WorkloadError) {
        if self.live {
            println!(
                "{} {}: {}",
                "✗".red().bold(),
                workload.to_string().red(),
                error
            );
        }
    }
}

#[derive(Tabled, Serialize)]
struct FailureRow {
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "NAMESPACE")]
    namespace: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ERROR")]
    error: String,
}

#[derive(Serialize)]
struct ReportDoc {
    token: String,
    matched: usize,
    restarted: usize,
    failures: Vec<FailureRow>,
}

pub fn print_pass_start(api_server: &str, token: &str) {
    println!("Connected to {}", api_server.dimmed());
    println!("Restarting workloads whose name contains '{}'", token.bold());
}

/// Print the final pass summary in the selected format
pub fn print_report(report: &RestartReport, token: &str, format: OutputFormat) -> anyhow::Result<()> {
    let doc = ReportDoc {
        token: token.to_string(),
        matched: report.matched,
        restarted: report.restarted,
        failures: report
            .failures
            .iter()
            .map(|failure| FailureRow {
                kind: failure.workload.kind.to_string(),
                namespace: failure.workload.namespace.clone(),
                name: failure.workload.name.clone(),
                error: failure.error.to_string(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&doc)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&doc)?),
        OutputFormat::Table => {
            println!();
            if doc.failures.is_empty() {
                println!(
                    "{} {} of {} matched workloads restarted",
                    "✓".green().bold(),
                    doc.restarted,
                    doc.matched
                );
            } else {
                println!(
                    "{} {} of {} matched workloads restarted, {} failed",
                    "✗".red().bold(),
                    doc.restarted,
                    doc.matched,
                    doc.failures.len()
                );
                println!("{}", Table::new(&doc.failures));
            }
        }
    }

    Ok(())
}
