//! Host identity for the `hostname` label.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::collector::traits::FileSystem;

/// Detects the machine's hostname, preferring the fully qualified name.
///
/// Tries `hostname -f`, then plain `hostname`, then the kernel's
/// `<proc>/sys/kernel/hostname`. Returns `None` if all of them fail.
pub fn detect_hostname(fs: &impl FileSystem, proc_path: &str) -> Option<String> {
    from_command(&["-f"])
        .or_else(|| from_command(&[]))
        .or_else(|| from_procfs(fs, proc_path))
}

fn from_command(args: &[&str]) -> Option<String> {
    let out = Command::new("hostname").args(args).output().ok()?;
    if !out.status.success() {
        debug!(?args, status = %out.status, "hostname command failed");
        return None;
    }
    String::from_utf8(out.stdout).ok().and_then(non_empty)
}

fn from_procfs(fs: &impl FileSystem, proc_path: &str) -> Option<String> {
    let path = format!("{}/sys/kernel/hostname", proc_path);
    fs.read_to_string(Path::new(&path)).ok().and_then(non_empty)
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
