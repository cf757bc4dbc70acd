//! puppet-exporter - Prometheus exporter for the Puppet agent.
//!
//! Reads the agent's `last_run_summary.yaml` on every scrape and exports it
//! as gauges, together with whether the agent process is running and
//! whether the summary could be read at all.
//!
//! - `collector` - status document reading, decoding, process probe and
//!   the Prometheus collector tying them together
//! - `config` - command line and environment configuration
//! - `hostname` - host identity for the `hostname` label
//! - `server` - HTTP endpoints
//! - `error` - error types

pub mod collector;
pub mod config;
pub mod error;
pub mod hostname;
pub mod server;
