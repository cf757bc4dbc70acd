//! Liveness hint for the agent process.

use tracing::warn;

use crate::collector::traits::ProcessLister;

/// Executable name the agent runs under.
pub const DEFAULT_AGENT_PROCESS: &str = "puppet";

/// Reports whether a process with the agent's executable name is running.
///
/// Matching is exact and case sensitive on the executable name only; paths
/// and arguments are not inspected.
pub struct AgentProbe<L: ProcessLister> {
    lister: L,
    name: String,
}

impl<L: ProcessLister> AgentProbe<L> {
    pub fn new(lister: L, name: impl Into<String>) -> Self {
        Self {
            lister,
            name: name.into(),
        }
    }

    /// Returns 1.0 if the agent is running, 0.0 otherwise.
    ///
    /// A failed enumeration is logged and reported as not running.
    pub fn agent_up(&self) -> f64 {
        match self.lister.executable_names() {
            Ok(names) => {
                if names.iter().any(|n| *n == self.name) {
                    1.0
                } else {
                    0.0
                }
            }
            Err(e) => {
                warn!(error = %e, "process enumeration failed, reporting agent down");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::procfs::ProcfsLister;
    use crate::error::ProbeError;
    use std::io;
    use std::path::PathBuf;

    struct FixedLister(Vec<&'static str>);

    impl ProcessLister for FixedLister {
        fn executable_names(&self) -> Result<Vec<String>, ProbeError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct BrokenLister;

    impl ProcessLister for BrokenLister {
        fn executable_names(&self) -> Result<Vec<String>, ProbeError> {
            Err(ProbeError {
                path: PathBuf::from("/proc"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn test_agent_found() {
        let probe = AgentProbe::new(FixedLister(vec!["systemd", "puppet"]), "puppet");
        assert_eq!(probe.agent_up(), 1.0);
    }

    #[test]
    fn test_agent_absent() {
        let probe = AgentProbe::new(FixedLister(vec!["systemd", "sshd"]), "puppet");
        assert_eq!(probe.agent_up(), 0.0);
    }

    #[test]
    fn test_match_is_exact() {
        for names in [
            vec!["Puppet"],
            vec!["puppetserver"],
            vec!["/opt/puppetlabs/bin/puppet"],
            vec!["pupp"],
            vec![],
        ] {
            let probe = AgentProbe::new(FixedLister(names.clone()), "puppet");
            assert_eq!(probe.agent_up(), 0.0, "matched {:?}", names);
        }
    }

    #[test]
    fn test_enumeration_failure_reports_down() {
        let probe = AgentProbe::new(BrokenLister, "puppet");
        assert_eq!(probe.agent_up(), 0.0);
    }

    #[test]
    fn test_with_procfs() {
        let running = AgentProbe::new(ProcfsLister::new(MockFs::agent_running(), "/proc"), "puppet");
        assert_eq!(running.agent_up(), 1.0);

        let idle = AgentProbe::new(ProcfsLister::new(MockFs::idle_host(), "/proc"), "puppet");
        assert_eq!(idle.agent_up(), 0.0);
    }

    #[test]
    fn test_custom_name() {
        let probe = AgentProbe::new(FixedLister(vec!["puppet", "chef-client"]), "chef-client");
        assert_eq!(probe.agent_up(), 1.0);
    }
}
