//! Pre-built mock hosts for testing.

use super::filesystem::MockFs;

/// Where scenarios place the status document.
pub const SUMMARY_PATH: &str = "/var/cache/puppet/public/last_run_summary.yaml";

/// A status document as the agent writes it after a clean run.
pub const CLEAN_RUN_SUMMARY: &str = "\
---
version:
  config: 1700000000
  puppet: \"7.24.0\"
resources:
  changed: 5
  corrective_change: 0
  failed: 0
  failed_to_restart: 0
  out_of_sync: 5
  restarted: 0
  scheduled: 0
  skipped: 1
  total: 20
time:
  catalog_application: 3.1
  config_retrieval: 2.5
  total: 12.5
  last_run: 1700000000
changes:
  total: 5
events:
  failure: 0
  success: 10
  total: 10
";

/// A status document from a run that failed before the agent recorded
/// `time.last_run`.
pub const INCOMPLETE_SUMMARY: &str = "\
---
version:
  puppet: \"7.24.0\"
time:
  total: 0.4
events:
  failure: 1
  total: 1
";

impl MockFs {
    /// A host with the agent daemon running next to a few unrelated
    /// processes, and a clean status document in place.
    pub fn agent_running() -> Self {
        let fs = Self::idle_host();
        fs.add_process(4242, "puppet");
        fs
    }

    /// A host without the agent process; the status document from the
    /// last run is still on disk.
    pub fn idle_host() -> Self {
        let fs = Self::new();
        fs.add_file("/proc/sys/kernel/hostname", "web01\n");
        fs.add_process(1, "systemd");
        fs.add_process(512, "sshd");
        fs.add_process(900, "(sd-pam)");
        fs.add_process(1001, "puppetserver");
        fs.add_file(SUMMARY_PATH, CLEAN_RUN_SUMMARY);
        fs
    }

    /// A freshly provisioned host: agent never ran, no status document.
    pub fn never_ran() -> Self {
        let fs = Self::new();
        fs.add_file("/proc/sys/kernel/hostname", "web02\n");
        fs.add_process(1, "systemd");
        fs
    }
}
