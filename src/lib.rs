//! imcsh - a small interactive shell
//!
//! Reads one line at a time, runs built-ins (`quit`, `bglist`, `globalusage`) in-process and
//! everything else as a child process, optionally in the background or with its standard
//! output redirected to a file. Background children are tracked in a bounded job registry.

#![deny(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces
)]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

/// Logs the error of a `Result` (if any) with some context, leaving control flow alone.
macro_rules! log_if_err {
    ($result:expr, $context:expr) => {
        if let Err(ref e) = $result {
            error!("{}: {}", $context, e);
        }
    };
    ($result:expr, $fmt:expr, $($arg:tt)+) => {
        if let Err(ref e) = $result {
            error!("{}: {}", format!($fmt, $($arg)+), e);
        }
    };
}

mod builtins;
pub mod errors;
pub mod execute_command;
pub mod jobs;
pub mod parser;
pub mod shell;
mod util;

pub use crate::execute_command::{ChildProcess, Process, ProcessId};
pub use crate::jobs::{Job, JobRegistry};
pub use crate::parser::Command;
pub use crate::shell::{Shell, ShellConfig, ShellState};
pub use crate::util::ImcshExitStatusExt;
