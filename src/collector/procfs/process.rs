//! Process table enumeration from `/proc/[pid]/stat`.

use std::path::Path;

use tracing::trace;

use crate::collector::traits::{FileSystem, ProcessLister};
use crate::error::ProbeError;

/// Extracts the executable name (the `comm` field) from a `/proc/[pid]/stat` line.
///
/// The name sits between the first `(` and the last `)`; it may itself
/// contain spaces and parentheses.
pub fn parse_stat_comm(content: &str) -> Option<&str> {
    let open_paren = content.find('(')?;
    let close_paren = content.rfind(')')?;
    if close_paren <= open_paren {
        return None;
    }
    Some(&content[open_paren + 1..close_paren])
}

/// Lists processes by walking a procfs mount.
pub struct ProcfsLister<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> ProcfsLister<F> {
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    fn read_comm(&self, pid: u32) -> Option<String> {
        let stat_path = format!("{}/{}/stat", self.proc_path, pid);
        let content = self.fs.read_to_string(Path::new(&stat_path)).ok()?;
        parse_stat_comm(&content).map(str::to_string)
    }
}

impl<F: FileSystem> ProcessLister for ProcfsLister<F> {
    /// Processes that disappear mid-walk are skipped.
    fn executable_names(&self) -> Result<Vec<String>, ProbeError> {
        let proc_path = Path::new(&self.proc_path);
        let entries = self.fs.read_dir(proc_path).map_err(|source| ProbeError {
            path: proc_path.to_path_buf(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            if let Some(name) = entry.file_name().and_then(|n| n.to_str())
                && let Ok(pid) = name.parse::<u32>()
            {
                match self.read_comm(pid) {
                    Some(comm) => names.push(comm),
                    None => trace!(pid, "process gone or unreadable, skipping"),
                }
            }
        }

        Ok(names)
    }
}
