use std::io::{BufRead, Write};

use crate::builtins::{self, BuiltinCommand};
use crate::errors::Result;
use crate::shell::{Shell, ShellState};

#[derive(Debug)]
pub struct Quit;

/// Answer to the "are you sure" question.
#[derive(Debug, PartialEq, Eq)]
enum Confirmation {
    Yes,
    No,
    Invalid,
}

impl<'a> From<&'a str> for Confirmation {
    fn from(answer: &'a str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Confirmation::Yes,
            "n" | "no" => Confirmation::No,
            _ => Confirmation::Invalid,
        }
    }
}

impl BuiltinCommand for Quit {
    const NAME: &'static str = builtins::QUIT_NAME;

    fn run<R: BufRead, W: Write>(shell: &mut Shell<R, W>) -> Result<ShellState> {
        // Jobs that already exited must neither be listed nor signaled.
        shell.notify_completed_jobs()?;
        if shell.jobs().is_empty() {
            writeln!(shell.output(), "Exiting IMCSH...")?;
            return Ok(ShellState::Terminating);
        }

        let lines: Vec<String> = shell.jobs().jobs().iter().map(|j| j.to_string()).collect();
        {
            let stdout = shell.output();
            writeln!(
                stdout,
                "The following processes are running, are you sure you want to quit? [Y/n]"
            )?;
            for line in &lines {
                writeln!(stdout, "{}", line)?;
            }
            stdout.flush()?;
        }

        let answer = match shell.read_input() {
            Ok(answer) => answer.unwrap_or_default(),
            Err(e) => {
                warn!("unable to read quit confirmation: {}", e);
                String::new()
            }
        };

        match Confirmation::from(answer.as_str()) {
            Confirmation::Yes => {
                info!("terminating {} background jobs", shell.jobs().len());
                shell.jobs_mut().terminate_all();
                writeln!(shell.output(), "Exiting IMCSH...")?;
                Ok(ShellState::Terminating)
            }
            Confirmation::No => {
                writeln!(shell.output(), "Quit canceled. Returning to shell.")?;
                Ok(ShellState::Running)
            }
            Confirmation::Invalid => {
                writeln!(shell.output(), "Invalid input. Please type Y or n.")?;
                Ok(ShellState::Running)
            }
        }
    }
}
