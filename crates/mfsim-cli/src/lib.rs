//! Library side of the `mfsim` command-line tool.
//!
//! Loading and saving container documents, the reports printed by the
//! subcommands and the logging setup live here so they can be tested
//! without spawning the binary.

pub mod document;
pub mod logging;
pub mod report;
