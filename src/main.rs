mod collectors;
mod config;
mod eventlog;
mod render;
mod report;
mod units;

use chrono::{Local, Utc};
use clap::Parser;
use collectors::system::collect_system;
use config::{Config, OutputFormat};
use eventlog::collect_event_log;
use eventlog::source::CommandLogSource;
use report::Report;
use sysinfo::{System, SystemExt};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "healthcheck")]
#[command(version)]
struct Cli {
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    output: Option<String>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }

    let mut cfg = match cli.config.as_deref() {
        Some(path) => match Config::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                error!(error = %err, "failed to load configuration");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(output) = cli.output {
        cfg.output_path = output;
    }
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    if let Err(err) = cfg.validate() {
        error!(error = %err, "invalid configuration");
        std::process::exit(1);
    }

    info!(
        output = %cfg.output_path,
        format = ?cfg.format,
        window_hours = cfg.log_window_hours,
        "generating health check"
    );

    let report = build_report(&cfg).await;

    if let Err(err) = render::write_report(&report, cfg.format, &cfg.output_path) {
        error!(error = %err, "failed to write health check");
        std::process::exit(1);
    }
    println!("✓ Health check written to {}", cfg.output_path);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build_report(cfg: &Config) -> Report {
    let generated_at = Local::now();

    let mut system = System::new();
    let snapshot = collect_system(
        &mut system,
        cfg.cpu_sample(),
        cfg.disk_warn_threshold_percent,
    )
    .await;

    let source = CommandLogSource::from_config(&cfg.log_source);
    let event_log = collect_event_log(&source, Utc::now(), cfg.log_window()).await;

    Report {
        generated_at,
        title: cfg.title.clone(),
        system: snapshot.host,
        cpu: snapshot.cpu,
        memory: snapshot.memory,
        disks: snapshot.disks,
        event_log,
    }
}
