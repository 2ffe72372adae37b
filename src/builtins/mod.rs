//! imcsh builtins
//!
//! A builtin is only recognized when it makes up the whole input line; builtins take no
//! arguments.

use std::io::{BufRead, Write};

use crate::errors::Result;
use crate::shell::{Shell, ShellState};

use self::jobs::Bglist;
use self::quit::Quit;

mod jobs;
mod quit;

const BGLIST_NAME: &str = "bglist";
const GLOBALUSAGE_NAME: &str = "globalusage";
const QUIT_NAME: &str = "quit";

/// Represents an imcsh builtin command such as quit or bglist.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// Runs the command in the `shell` environment.
    fn run<R: BufRead, W: Write>(shell: &mut Shell<R, W>) -> Result<ShellState>;
}

pub fn is_builtin(input: &str) -> bool {
    [BGLIST_NAME, GLOBALUSAGE_NAME, QUIT_NAME].contains(&input)
}

/// precondition: `input` is a builtin.
pub fn run<R: BufRead, W: Write>(shell: &mut Shell<R, W>, input: &str) -> Result<ShellState> {
    assert!(is_builtin(input));
    debug!("running builtin {}", input);
    match input {
        BGLIST_NAME => Bglist::run(shell),
        GLOBALUSAGE_NAME => GlobalUsage::run(shell),
        QUIT_NAME => Quit::run(shell),
        _ => unreachable!(),
    }
}

#[derive(Debug)]
pub struct GlobalUsage;

impl BuiltinCommand for GlobalUsage {
    const NAME: &'static str = GLOBALUSAGE_NAME;

    fn run<R: BufRead, W: Write>(shell: &mut Shell<R, W>) -> Result<ShellState> {
        writeln!(
            shell.output(),
            "IMCSH Version 1.1 created by Alexandra and Gabriela"
        )?;
        Ok(ShellState::Running)
    }
}
