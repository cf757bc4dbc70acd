//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::collector::probe::DEFAULT_AGENT_PROCESS;
use crate::error::ExporterError;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:9140";
pub const DEFAULT_SUMMARY_FILE: &str = "/var/cache/puppet/public/last_run_summary.yaml";
pub const DEFAULT_PROC_PATH: &str = "/proc";

/// Prometheus exporter for the Puppet agent's last run summary.
#[derive(Parser, Debug)]
#[command(name = "puppet-exporter", version)]
pub struct Args {
    /// Listen address.
    #[arg(long, default_value = DEFAULT_LISTEN, env = "LISTEN")]
    pub listen: String,

    /// Puppet last_run_summary.yaml.
    #[arg(long, default_value = DEFAULT_SUMMARY_FILE, env = "SUMMARY_FILE")]
    pub summary_file: String,

    /// Executable name of the agent process reported by puppet_agent_up.
    #[arg(long, default_value = DEFAULT_AGENT_PROCESS, env = "AGENT_PROCESS")]
    pub agent_process: String,

    /// Value of the hostname label. Detected from the host if not set.
    #[arg(long, env = "HOSTNAME_LABEL")]
    pub hostname: Option<String>,

    /// Export series without the hostname label.
    #[arg(long)]
    pub no_hostname_label: bool,

    /// Path to /proc filesystem.
    #[arg(long, default_value = DEFAULT_PROC_PATH)]
    pub proc_path: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// How the `hostname` label is filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostnameLabel {
    Fixed(String),
    Detect,
    Disabled,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: SocketAddr,
    pub summary_file: PathBuf,
    pub agent_process: String,
    pub hostname: HostnameLabel,
    pub proc_path: String,
}

/// Blank values, e.g. from `LISTEN=`, fall back to the default.
fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl TryFrom<Args> for Config {
    type Error = ExporterError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let listen = or_default(args.listen, DEFAULT_LISTEN);
        let listen = listen
            .parse::<SocketAddr>()
            .map_err(|source| ExporterError::ListenAddr {
                addr: listen.clone(),
                source,
            })?;

        let hostname = match args.hostname {
            _ if args.no_hostname_label => HostnameLabel::Disabled,
            Some(h) if !h.trim().is_empty() => HostnameLabel::Fixed(h.trim().to_string()),
            _ => HostnameLabel::Detect,
        };

        Ok(Self {
            listen,
            summary_file: PathBuf::from(or_default(args.summary_file, DEFAULT_SUMMARY_FILE)),
            agent_process: or_default(args.agent_process, DEFAULT_AGENT_PROCESS),
            hostname,
            proc_path: or_default(args.proc_path, DEFAULT_PROC_PATH),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // The environment is process-wide and clap reads it on every parse.
    static ENV: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _env = env_lock();
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }
        let result = f();
        for (key, _) in vars {
            unsafe { std::env::remove_var(key) };
        }
        result
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("puppet-exporter").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_flags() {
        let _env = env_lock();
        let config = Config::try_from(parse(&[
            "--listen",
            "127.0.0.1:9999",
            "--summary-file",
            "/tmp/summary.yaml",
            "--agent-process",
            "chef-client",
            "--hostname",
            "db01.example.com",
            "--proc-path",
            "/host/proc",
        ]))
        .unwrap();

        assert_eq!(config.listen, "127.0.0.1:9999".parse::<SocketAddr>().unwrap());
        assert_eq!(config.summary_file, PathBuf::from("/tmp/summary.yaml"));
        assert_eq!(config.agent_process, "chef-client");
        assert_eq!(
            config.hostname,
            HostnameLabel::Fixed("db01.example.com".to_string())
        );
        assert_eq!(config.proc_path, "/host/proc");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let _env = env_lock();
        let config = Config::try_from(parse(&[
            "--listen",
            "",
            "--summary-file",
            "",
            "--agent-process",
            " ",
            "--hostname",
            "",
        ]))
        .unwrap();

        assert_eq!(config.listen, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert_eq!(config.summary_file, PathBuf::from(DEFAULT_SUMMARY_FILE));
        assert_eq!(config.agent_process, DEFAULT_AGENT_PROCESS);
        assert_eq!(config.hostname, HostnameLabel::Detect);
    }

    #[test]
    fn test_no_hostname_label_wins() {
        let _env = env_lock();
        let config =
            Config::try_from(parse(&["--hostname", "web01", "--no-hostname-label"])).unwrap();
        assert_eq!(config.hostname, HostnameLabel::Disabled);
    }

    #[test]
    fn test_invalid_listen() {
        let _env = env_lock();
        let err = Config::try_from(parse(&["--listen", "not-an-address"])).unwrap_err();
        assert!(matches!(err, ExporterError::ListenAddr { ref addr, .. } if addr == "not-an-address"));
    }

    #[test]
    fn test_verbosity() {
        let _env = env_lock();
        let args = parse(&["-vv", "-q"]);
        assert_eq!(args.verbose, 2);
        assert!(args.quiet);
    }

    #[test]
    fn test_env_used_without_flag() {
        let config = with_env(
            &[
                ("LISTEN", "127.0.0.1:9100"),
                ("SUMMARY_FILE", "/opt/puppetlabs/puppet/cache/state/last_run_summary.yaml"),
            ],
            || Config::try_from(parse(&[])).unwrap(),
        );

        assert_eq!(config.listen, "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.summary_file,
            PathBuf::from("/opt/puppetlabs/puppet/cache/state/last_run_summary.yaml")
        );
    }

    #[test]
    fn test_flag_beats_env() {
        let config = with_env(
            &[("LISTEN", "127.0.0.1:9100"), ("SUMMARY_FILE", "/env/summary.yaml")],
            || {
                Config::try_from(parse(&[
                    "--listen",
                    "127.0.0.1:9999",
                    "--summary-file",
                    "/flag/summary.yaml",
                ]))
                .unwrap()
            },
        );

        assert_eq!(config.listen, "127.0.0.1:9999".parse::<SocketAddr>().unwrap());
        assert_eq!(config.summary_file, PathBuf::from("/flag/summary.yaml"));
    }

    #[test]
    fn test_blank_env_falls_back() {
        let config = with_env(&[("LISTEN", ""), ("SUMMARY_FILE", "")], || {
            Config::try_from(parse(&[])).unwrap()
        });

        assert_eq!(config.listen, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert_eq!(config.summary_file, PathBuf::from(DEFAULT_SUMMARY_FILE));
    }
}
