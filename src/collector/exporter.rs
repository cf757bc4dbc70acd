//! The summary collector: turns the status document and the process table
//! into the exported gauge set on every scrape.
//!
//! A cycle runs under one mutex hold, from the probe through to reading
//! the gauges back out, so concurrent scrapes are serialized and each one
//! sees values that all come from the same cycle.

use std::sync::{Mutex, MutexGuard};

use chrono::DateTime;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};
use tracing::{debug, warn};

use crate::collector::probe::AgentProbe;
use crate::collector::reader::SummaryReader;
use crate::collector::summary::LastRunSummary;
use crate::collector::traits::{FileSystem, ProcessLister};
use crate::error::{ExporterError, SummaryError};

/// Namespace prefixed to every exported metric.
pub const NAMESPACE: &str = "puppet";

/// Name of the const label carrying the host identity.
pub const HOSTNAME_LABEL: &str = "hostname";

/// Values derived from the last successfully decoded status document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryValues {
    pub time_total: f64,
    pub time_last_run: f64,
    pub events_failure: f64,
    pub events_success: f64,
    pub events_total: f64,
    pub resources_failed: f64,
    pub resources_skipped: f64,
    pub resources_total: f64,
    pub resources_changed: f64,
}

impl From<&LastRunSummary> for SummaryValues {
    fn from(s: &LastRunSummary) -> Self {
        Self {
            time_total: s.time.total,
            time_last_run: s.time.last_run as f64,
            events_failure: s.events.failure as f64,
            events_success: s.events.success as f64,
            events_total: s.events.total as f64,
            resources_failed: s.resources.failed as f64,
            resources_skipped: s.resources.skipped as f64,
            resources_total: s.resources.total as f64,
            resources_changed: s.resources.changed as f64,
        }
    }
}

/// Plain copy of the exported gauges, taken at the end of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportedSnapshot {
    pub exporter_up: f64,
    pub agent_up: f64,
    pub summary_read_error: f64,
    /// `None` until a cycle has decoded a valid document.
    pub summary: Option<SummaryValues>,
}

/// The exported gauge set. Written only by [`SummaryCollector`].
struct Gauges {
    exporter_up: Gauge,
    time_total: Gauge,
    time_last_run: Gauge,
    events_failure: Gauge,
    events_success: Gauge,
    events_total: Gauge,
    resources_failed: Gauge,
    resources_skipped: Gauge,
    resources_total: Gauge,
    resources_changed: Gauge,
    summary_read_err: Gauge,
    agent_up: Gauge,
}

impl Gauges {
    fn new(hostname: Option<&str>) -> Result<Self, prometheus::Error> {
        let gauge = |name: &str, help: &str| {
            let mut opts = Opts::new(name, help).namespace(NAMESPACE);
            if let Some(host) = hostname {
                opts = opts.const_label(HOSTNAME_LABEL, host);
            }
            Gauge::with_opts(opts)
        };

        Ok(Self {
            exporter_up: gauge("exporter_up", "Exporter up")?,
            time_total: gauge("time_total", "Last run duration")?,
            time_last_run: gauge("time_last_run", "Last run timestamp")?,
            events_failure: gauge("events_failure", "Last run events_failure")?,
            events_success: gauge("events_success", "Last run events_success")?,
            events_total: gauge("events_total", "Last run events_total")?,
            resources_failed: gauge("resources_failed", "Last run resources_failed")?,
            resources_skipped: gauge("resources_skipped", "Last run resources_skipped")?,
            resources_total: gauge("resources_total", "Last run resources_total")?,
            resources_changed: gauge("resources_changed", "Last run resources_changed")?,
            summary_read_err: gauge("summary_read_err", "Summary file read error")?,
            agent_up: gauge("agent_up", "Agent process up")?,
        })
    }

    fn summary(&self) -> [&Gauge; 9] {
        [
            &self.time_total,
            &self.time_last_run,
            &self.events_failure,
            &self.events_success,
            &self.events_total,
            &self.resources_failed,
            &self.resources_skipped,
            &self.resources_total,
            &self.resources_changed,
        ]
    }

    fn all(&self) -> impl Iterator<Item = &Gauge> {
        [&self.exporter_up, &self.agent_up]
            .into_iter()
            .chain(self.summary())
            .chain([&self.summary_read_err])
    }

    fn publish(&self, values: &SummaryValues) {
        self.time_total.set(values.time_total);
        self.time_last_run.set(values.time_last_run);
        self.events_failure.set(values.events_failure);
        self.events_success.set(values.events_success);
        self.events_total.set(values.events_total);
        self.resources_failed.set(values.resources_failed);
        self.resources_skipped.set(values.resources_skipped);
        self.resources_total.set(values.resources_total);
        self.resources_changed.set(values.resources_changed);
    }

    fn summary_values(&self) -> SummaryValues {
        SummaryValues {
            time_total: self.time_total.get(),
            time_last_run: self.time_last_run.get(),
            events_failure: self.events_failure.get(),
            events_success: self.events_success.get(),
            events_total: self.events_total.get(),
            resources_failed: self.resources_failed.get(),
            resources_skipped: self.resources_skipped.get(),
            resources_total: self.resources_total.get(),
            resources_changed: self.resources_changed.get(),
        }
    }
}

/// State carried between cycles besides the gauge values themselves.
#[derive(Debug, Default)]
struct CycleState {
    /// Set once any cycle has written the summary gauges.
    published: bool,
}

/// Collects the agent's last run summary and liveness on demand.
///
/// Register it with a [`prometheus::Registry`]; every `gather` runs one
/// collection cycle. Read and decode failures never fail the scrape: they
/// raise `puppet_summary_read_err` and leave the summary gauges at their
/// previous values.
pub struct SummaryCollector<F: FileSystem, L: ProcessLister> {
    reader: SummaryReader<F>,
    probe: AgentProbe<L>,
    gauges: Gauges,
    state: Mutex<CycleState>,
}

impl<F: FileSystem, L: ProcessLister> SummaryCollector<F, L> {
    /// Creates the collector and its gauges.
    ///
    /// `hostname` becomes a const label on every series; `None` leaves the
    /// series unlabeled.
    pub fn new(
        reader: SummaryReader<F>,
        probe: AgentProbe<L>,
        hostname: Option<&str>,
    ) -> Result<Self, ExporterError> {
        Ok(Self {
            reader,
            probe,
            gauges: Gauges::new(hostname)?,
            state: Mutex::new(CycleState::default()),
        })
    }

    /// Runs one cycle and returns the resulting values.
    pub fn collect_snapshot(&self) -> ExportedSnapshot {
        let mut state = self.lock();
        self.run_cycle(&mut state);

        ExportedSnapshot {
            exporter_up: self.gauges.exporter_up.get(),
            agent_up: self.gauges.agent_up.get(),
            summary_read_error: self.gauges.summary_read_err.get(),
            summary: state.published.then(|| self.gauges.summary_values()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CycleState> {
        // A panic mid-cycle leaves the gauges consistent enough to keep serving.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load(&self) -> Result<LastRunSummary, SummaryError> {
        let content = self.reader.read()?;
        Ok(LastRunSummary::parse(&content)?)
    }

    fn run_cycle(&self, state: &mut CycleState) {
        self.gauges.exporter_up.set(1.0);
        self.gauges.agent_up.set(self.probe.agent_up());

        match self.load() {
            Ok(summary) => {
                self.gauges.publish(&SummaryValues::from(&summary));
                self.gauges.summary_read_err.set(0.0);
                state.published = true;

                let last_run = DateTime::from_timestamp(summary.time.last_run, 0)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| summary.time.last_run.to_string());
                debug!(
                    %last_run,
                    duration = summary.time.total,
                    events_failure = summary.events.failure,
                    resources_failed = summary.resources.failed,
                    resources_changed = summary.resources.changed,
                    "summary collected"
                );
            }
            Err(e) => {
                self.gauges.summary_read_err.set(1.0);
                warn!(
                    path = %self.reader.path().display(),
                    error = %e,
                    "summary unavailable, keeping previous values"
                );
            }
        }
    }
}

impl<F, L> Collector for SummaryCollector<F, L>
where
    F: FileSystem + 'static,
    L: ProcessLister + 'static,
{
    fn desc(&self) -> Vec<&Desc> {
        self.gauges.all().flat_map(|g| g.desc()).collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut state = self.lock();
        self.run_cycle(&mut state);

        let mut families = Vec::with_capacity(12);
        families.extend(self.gauges.exporter_up.collect());
        families.extend(self.gauges.agent_up.collect());
        if state.published {
            for gauge in self.gauges.summary() {
                families.extend(gauge.collect());
            }
        }
        families.extend(self.gauges.summary_read_err.collect());
        families
    }
}
