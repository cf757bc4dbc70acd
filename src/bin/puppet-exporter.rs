//! puppet-exporter - serves the Puppet agent's last run summary to Prometheus.
//!
//! Usage:
//!   puppet-exporter                                    # 0.0.0.0:9140, default summary path
//!   puppet-exporter --listen 127.0.0.1:9140
//!   SUMMARY_FILE=/opt/puppetlabs/puppet/cache/state/last_run_summary.yaml puppet-exporter

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use puppet_exporter::collector::{
    AgentProbe, ProcfsLister, RealFs, SummaryCollector, SummaryReader,
};
use puppet_exporter::config::{Args, Config, HostnameLabel};
use puppet_exporter::error::ExporterError;
use puppet_exporter::hostname::detect_hostname;
use puppet_exporter::server;

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("puppet_exporter={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn resolve_hostname(label: &HostnameLabel, proc_path: &str) -> Option<String> {
    match label {
        HostnameLabel::Fixed(name) => Some(name.clone()),
        HostnameLabel::Disabled => None,
        HostnameLabel::Detect => {
            let detected = detect_hostname(&RealFs::new(), proc_path);
            if detected.is_none() {
                warn!("Could not detect hostname, exporting series without hostname label");
            }
            detected
        }
    }
}

fn run(config: Config) -> Result<(), ExporterError> {
    let hostname = resolve_hostname(&config.hostname, &config.proc_path);

    info!(
        listen = %config.listen,
        summary_file = %config.summary_file.display(),
        agent_process = %config.agent_process,
        hostname = hostname.as_deref().unwrap_or("-"),
        "Config"
    );

    let collector = SummaryCollector::new(
        SummaryReader::new(RealFs::new(), &config.summary_file),
        AgentProbe::new(
            ProcfsLister::new(RealFs::new(), &config.proc_path),
            &config.agent_process,
        ),
        hostname.as_deref(),
    )?;
    let registry = Arc::new(server::registry_with(collector)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ExporterError::Serve)?;
    runtime.block_on(server::serve(config.listen, registry))
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("puppet-exporter {} starting", env!("CARGO_PKG_VERSION"));

    let config = match Config::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = run(config) {
        error!("{}", e);
        process::exit(1);
    }

    info!("Shutting down...");
}
