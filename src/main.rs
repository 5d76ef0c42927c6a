//! Biofeedback CLI
//!
//! Command-line frontend for the biofeedback tracker:
//! - Show the trend, latest-entry and summary views
//! - Submit entries (behind the entry gate)
//! - Ingest dictated transcripts and generate sample ones
//! - Export the chart table

use anyhow::{bail, Context};
use biofeedback::auth::{AuthGate, AuthMode};
use biofeedback::config::{generate_default_config, Config};
use biofeedback::export::{export_entries, ExportFormat};
use biofeedback::ingest::{ingest_directory, TranscriptParser};
use biofeedback::render::{render_entry_notes, render_metric_details, render_tab};
use biofeedback::samples::write_samples;
use biofeedback::session::{Dashboard, SubmitOutcome, SubmitRejected, Tab};
use biofeedback::{BiofeedbackApi, DateRange, HttpClient};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "biofeedback")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track and chart daily biofeedback self-reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show charts for a date range
    Show {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// View: trend, latest, summary, all
        #[arg(short, long, default_value = "all")]
        view: String,
        /// Focus a single metric (e.g. sleep_quality)
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Submit an entry as JSON
    Submit {
        /// Entry JSON text
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,
        /// Read entry JSON from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Entry form password. Prompted when omitted, except when the
        /// entry is read from stdin, where it is required.
        #[arg(long, required_unless_present_any = ["json", "file"])]
        password: Option<String>,
    },

    /// Parse and submit every transcript in a directory
    Ingest {
        /// Directory of {"text": ...} JSON files
        dir: PathBuf,
        /// Parse only, submit nothing
        #[arg(long)]
        dry_run: bool,
        /// Entry form password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Generate sample transcripts
    Samples {
        /// Number of days
        #[arg(short, long, default_value = "30")]
        count: usize,
        /// Output directory
        #[arg(short, long, default_value = "sample_data")]
        output: PathBuf,
        /// Most recent date (default: today)
        #[arg(long)]
        start: Option<String>,
        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export entries
    Export {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show notes for the entries on a date
    Notes {
        /// Entry date (YYYY-MM-DD)
        date: String,
        /// Only this metric's notes
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    biofeedback::logging::init_tracing(&config.logging);
    tracing::debug!(api = %config.api.base_url, "Biofeedback CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Show {
            start,
            end,
            view,
            metric,
        } => {
            let range = DateRange::parse(start.as_deref(), end.as_deref())?;
            let tabs = parse_view(&view)?;

            let mut dashboard = Dashboard::new(HttpClient::from_config(&config.api)?);
            dashboard.set_range(range).await;
            dashboard.session_mut().select_metric(metric.clone());

            let session = dashboard.session();
            if let Some(error) = session.error() {
                bail!("{}", error);
            }

            let chart = session.chart();
            let opts = config.display.chart_options();

            println!("Range: {}\n", range.label());
            for tab in tabs {
                println!("{}", render_tab(tab, &chart, &opts));
            }

            if let Some(metric) = metric {
                println!("{}", render_metric_details(session.entries(), &metric));
            }
        }

        Commands::Submit {
            json,
            file,
            password,
        } => {
            let mut client = HttpClient::from_config(&config.api)?;
            unlock(&config, &mut client, password).await?;

            let input = match (json, file) {
                (Some(json), _) => json,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let mut dashboard = Dashboard::new(client);
            dashboard.session_mut().set_input(input);
            let outcome = dashboard.submit().await;
            let notice = dashboard
                .session()
                .notice()
                .map(|n| n.text().to_string())
                .unwrap_or_default();

            match outcome {
                SubmitOutcome::Submitted { .. } => {
                    println!("{}", notice);
                    let chart = dashboard.session().chart();
                    println!(
                        "\n{}",
                        render_tab(Tab::Latest, &chart, &config.display.chart_options())
                    );
                }
                SubmitOutcome::Rejected(SubmitRejected::InFlight) => {
                    bail!("A submission is already in progress")
                }
                SubmitOutcome::Rejected(SubmitRejected::InvalidJson) | SubmitOutcome::Failed => {
                    bail!("{}", notice)
                }
            }
        }

        Commands::Ingest {
            dir,
            dry_run,
            password,
        } => {
            let mut client = HttpClient::from_config(&config.api)?;
            if !dry_run {
                unlock(&config, &mut client, password).await?;
            }

            let parser =
                TranscriptParser::new(&config.ingest.metrics, config.ingest.summary_chars)?;
            let now = Local::now().naive_local();
            let report = ingest_directory(&client, &parser, &dir, now, dry_run).await?;

            println!("Ingest results:");
            println!("  Files parsed: {}", report.parsed.len());
            for (path, entry) in &report.parsed {
                println!(
                    "    {} -> {} ({} metrics, {} notes)",
                    path.display(),
                    entry.date,
                    entry.metrics.len(),
                    entry.additional_notes.len()
                );
            }

            if dry_run {
                println!();
                println!("(Dry run - nothing was submitted)");
            } else {
                println!("  Submitted: {}", report.submitted);
            }

            if !report.failed.is_empty() {
                println!("  Failed: {}", report.failed.len());
                for (path, error) in &report.failed {
                    println!("    {}: {}", path.display(), error);
                }
            }
        }

        Commands::Samples {
            count,
            output,
            start,
            seed,
        } => {
            let start = match start {
                Some(s) => biofeedback::model::parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let files = write_samples(&output, &config.ingest.metrics, count, start, &mut rng)?;
            println!("Generated {} sample files in {}", files.len(), output.display());
        }

        Commands::Export {
            start,
            end,
            format,
            output,
        } => {
            let range = DateRange::parse(start.as_deref(), end.as_deref())?;
            let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;

            let client = HttpClient::from_config(&config.api)?;
            let entries = client.fetch_entries(&range).await?;

            let rows = match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {:?}", path))?;
                    let rows = export_entries(&entries, format, file)?;
                    eprintln!("Exported {} entries to {}", rows, path.display());
                    rows
                }
                None => {
                    let stdout = std::io::stdout();
                    let rows = export_entries(&entries, format, stdout.lock())?;
                    println!();
                    rows
                }
            };
            tracing::info!(rows, "Export complete");
        }

        Commands::Notes { date, metric } => {
            let day: NaiveDate = biofeedback::model::parse_date(&date)?;
            let range = DateRange::new(Some(day), Some(day))?;

            let client = HttpClient::from_config(&config.api)?;
            let entries = client.fetch_entries(&range).await?;
            let on_day: Vec<_> = entries.iter().filter(|e| e.date == day).collect();

            if on_day.is_empty() {
                println!("No entry for {}.", day);
            }
            for entry in on_day {
                println!("{}", render_entry_notes(entry, metric.as_deref()));
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &content)?;
                println!("Config written to {}", path.display());
            } else {
                print!("{}", content);
            }
        }
    }

    Ok(())
}

fn parse_view(view: &str) -> anyhow::Result<Vec<Tab>> {
    if view.trim().eq_ignore_ascii_case("all") {
        Ok(Tab::ALL.to_vec())
    } else {
        Ok(vec![view.parse().map_err(anyhow::Error::msg)?])
    }
}

/// Pass the entry gate, attaching the API token in token mode
async fn unlock(
    config: &Config,
    client: &mut HttpClient,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    let mut gate = AuthGate::new();
    let unlocked = match config.auth.mode {
        AuthMode::Password => gate.check_password(&config.auth.password, &password),
        AuthMode::Token => gate.login(&*client, &config.auth.username, &password).await,
    };

    if !unlocked {
        bail!("{}", gate.message().unwrap_or("Access denied"));
    }

    client.set_token(gate.token().map(str::to_string));
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}
