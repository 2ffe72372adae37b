//! imcsh - Shell Module
//!
//! The Shell reads one line at a time, dispatches built-ins and external commands, and owns
//! the registry of background jobs.

use std::fmt;
use std::io::{BufRead, Write};

use crate::builtins;
use crate::errors::Result;
use crate::execute_command::{spawn_process, Process};
use crate::jobs::{JobRegistry, DEFAULT_JOB_CAPACITY};
use crate::parser::Command;
use crate::util;

pub mod prompt;

/// Size of the input buffer, the longest accepted line is one character shorter.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 100;

/// Whether the shell keeps reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellState {
    /// Keep reading and dispatching lines.
    Running,
    /// `quit` was confirmed, stop reading input.
    Terminating,
}

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Maximum number of tracked background jobs.
    job_capacity: usize,

    /// Size of the input buffer. Longer lines are truncated.
    max_input_length: usize,

    /// Determines if the `user@host> ` prompt is written before reading a line.
    display_prompt: bool,
}

impl ShellConfig {
    /// Creates an interactive shell configuration, i.e. a prompt is displayed.
    pub fn interactive() -> Self {
        Self {
            display_prompt: true,
            ..Default::default()
        }
    }

    /// Creates a noninteractive shell configuration, i.e. no prompt is displayed.
    pub fn noninteractive() -> Self {
        Default::default()
    }

    /// Sets the maximum number of tracked background jobs.
    pub fn with_job_capacity(self, job_capacity: usize) -> Self {
        Self {
            job_capacity,
            ..self
        }
    }

    /// Sets the size of the input buffer.
    pub fn with_max_input_length(self, max_input_length: usize) -> Self {
        Self {
            max_input_length,
            ..self
        }
    }

    /// Maximum number of tracked background jobs.
    pub fn job_capacity(&self) -> usize {
        self.job_capacity
    }

    /// Returns `true` if a prompt is displayed before reading input.
    pub fn display_prompt(&self) -> bool {
        self.display_prompt
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            job_capacity: DEFAULT_JOB_CAPACITY,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            display_prompt: false,
        }
    }
}

/// imcsh Shell
pub struct Shell<R, W> {
    input: R,
    output: W,
    job_registry: JobRegistry,
    config: ShellConfig,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Constructs a new Shell reading lines from `input` and writing messages to `output`.
    pub fn new(config: ShellConfig, input: R, output: W) -> Self {
        info!("imcsh started up with {:?}", config);
        Self {
            input,
            output,
            job_registry: JobRegistry::with_capacity(config.job_capacity),
            config,
        }
    }

    /// The shell's background jobs.
    pub fn jobs(&self) -> &JobRegistry {
        &self.job_registry
    }

    pub(crate) fn jobs_mut(&mut self) -> &mut JobRegistry {
        &mut self.job_registry
    }

    pub(crate) fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Displays the prompt (if configured) and reads the next line.
    /// Returns `None` when end of input is reached.
    pub fn prompt(&mut self) -> Result<Option<String>> {
        if self.config.display_prompt {
            write!(self.output, "{}", prompt::prompt())?;
            self.output.flush()?;
        }
        self.read_input()
    }

    /// Reads one line without its trailing newline, truncated to fit the input buffer.
    pub(crate) fn read_input(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
        }

        let max_chars = self.config.max_input_length.saturating_sub(1);
        if line.chars().count() > max_chars {
            debug!("truncating input to {} characters", max_chars);
            util::truncate_chars(&mut line, max_chars);
        }
        Ok(Some(line))
    }

    /// Runs lines from the input until `quit` is confirmed or the input ends.
    pub fn execute_from_input(&mut self) -> Result<()> {
        loop {
            let input = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("end of input reached");
                    break;
                }
                Err(e) => {
                    error!("failed to read input: {}", e);
                    writeln!(self.output, "Error reading input.")?;
                    String::new()
                }
            };

            match self.execute_command_string(&input) {
                Ok(ShellState::Running) => {}
                Ok(ShellState::Terminating) => break,
                Err(e) => {
                    error!("execute_command_string: {}", e);
                    eprintln!("imcsh: {}", e);
                }
            }
        }

        self.output.flush()?;
        info!("imcsh has shut down");
        Ok(())
    }

    /// Runs a single input line.
    ///
    /// Built-ins must make up the whole line. Anything else is parsed and launched, after
    /// which finished background jobs are reported.
    pub fn execute_command_string(&mut self, input: &str) -> Result<ShellState> {
        if builtins::is_builtin(input) {
            return builtins::run(self, input);
        }

        let result = self.execute_command(input);
        self.notify_completed_jobs()?;
        result.map(|_| ShellState::Running)
    }

    fn execute_command(&mut self, input: &str) -> Result<()> {
        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => {
                debug!("discarding {:?}: {}", input, e);
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };
        let program = match command.program() {
            Some(program) => program.to_string(),
            None => return Ok(()),
        };

        // Anything still buffered would otherwise interleave with the child's output.
        self.output.flush()?;
        let mut child = match spawn_process(&command.argv[..], command.outfile.as_deref()) {
            Ok(child) => child,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };

        if command.background {
            writeln!(
                self.output,
                "Process running in background (PID: {})",
                child.id()
            )?;
            if let Err(e) = self.job_registry.register(child, program) {
                writeln!(self.output, "Error: {}", e)?;
            }
        } else {
            let status = child.wait()?;
            debug!("foreground job {} finished with {}", program, status);
        }

        Ok(())
    }

    /// Reports and forgets background jobs that have finished.
    pub(crate) fn notify_completed_jobs(&mut self) -> Result<()> {
        for job in self.job_registry.poll_completed() {
            writeln!(
                self.output,
                "Background process (PID: {}, Command: {}) has finished.",
                job.id, job.command
            )?;
        }
        Ok(())
    }
}

impl<R, W> fmt::Debug for Shell<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}\n{:?}", self.config, self.job_registry)
    }
}
