//! Readers for the Linux `/proc` filesystem.

pub mod process;

pub use process::ProcfsLister;
