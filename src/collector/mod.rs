//! Collection of the agent's last run summary and liveness.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SummaryCollector                        │
//! │            (Mutex held for a whole scrape cycle)             │
//! │  ┌──────────────────────┐       ┌──────────────────────────┐ │
//! │  │    SummaryReader     │       │       AgentProbe         │ │
//! │  │  last_run_summary    │       │  "puppet" in the process │ │
//! │  │  .yaml -> bytes      │       │  table?                  │ │
//! │  └──────────┬───────────┘       └────────────┬─────────────┘ │
//! │  ┌──────────▼───────────┐       ┌────────────▼─────────────┐ │
//! │  │ LastRunSummary::parse│       │  ProcessLister (trait)   │ │
//! │  └──────────────────────┘       │  ProcfsLister: /proc/*/  │ │
//! │                                 │  stat                    │ │
//! │                                 └────────────┬─────────────┘ │
//! │             ┌────────────────────────────────┘               │
//! │      ┌──────▼──────┐                                         │
//! │      │  FileSystem │ (trait)                                 │
//! │      └──────┬──────┘                                         │
//! └─────────────┼────────────────────────────────────────────────┘
//!        ┌──────┴───────┐
//!  ┌─────▼─────┐ ┌──────▼──────┐
//!  │  RealFs   │ │   MockFs    │
//!  └───────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use puppet_exporter::collector::{
//!     AgentProbe, MockFs, ProcfsLister, SummaryCollector, SummaryReader,
//! };
//! use puppet_exporter::collector::mock::SUMMARY_PATH;
//!
//! let fs = MockFs::agent_running();
//! let collector = SummaryCollector::new(
//!     SummaryReader::new(fs.clone(), SUMMARY_PATH),
//!     AgentProbe::new(ProcfsLister::new(fs, "/proc"), "puppet"),
//!     Some("web01"),
//! )
//! .unwrap();
//!
//! let snapshot = collector.collect_snapshot();
//! assert_eq!(snapshot.agent_up, 1.0);
//! assert_eq!(snapshot.summary_read_error, 0.0);
//! ```

pub mod exporter;
pub mod mock;
pub mod probe;
pub mod procfs;
pub mod reader;
pub mod summary;
pub mod traits;

pub use exporter::{ExportedSnapshot, SummaryCollector, SummaryValues};
pub use mock::MockFs;
pub use probe::AgentProbe;
pub use procfs::ProcfsLister;
pub use reader::SummaryReader;
pub use summary::LastRunSummary;
pub use traits::{FileSystem, ProcessLister, RealFs};
