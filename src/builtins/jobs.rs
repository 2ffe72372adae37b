use std::io::{BufRead, Write};

use crate::builtins::{self, BuiltinCommand};
use crate::errors::Result;
use crate::shell::{Shell, ShellState};

#[derive(Debug)]
pub struct Bglist;

impl BuiltinCommand for Bglist {
    const NAME: &'static str = builtins::BGLIST_NAME;

    fn run<R: BufRead, W: Write>(shell: &mut Shell<R, W>) -> Result<ShellState> {
        let lines: Vec<String> = shell.jobs().jobs().iter().map(|j| j.to_string()).collect();
        let stdout = shell.output();
        if lines.is_empty() {
            writeln!(stdout, "No background processes are currently running.")?;
        } else {
            writeln!(stdout, "Background Processes:")?;
            for line in &lines {
                writeln!(stdout, "{}", line)?;
            }
        }

        Ok(ShellState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::tests::{output_of, shell_with_input};
    use crate::shell::ShellConfig;

    #[test]
    fn test_bglist_empty() {
        let mut shell = shell_with_input(ShellConfig::noninteractive(), "");
        assert_eq!(Bglist::run(&mut shell).unwrap(), ShellState::Running);
        assert_eq!(
            output_of(&mut shell),
            "No background processes are currently running.\n"
        );
    }

    #[test]
    fn test_bglist_in_spawn_order() {
        let mut shell = shell_with_input(ShellConfig::noninteractive(), "");
        shell.execute_command_string("sleep 30 &").unwrap();
        shell.execute_command_string("tail -f /dev/null &").unwrap();
        output_of(&mut shell);

        Bglist::run(&mut shell).unwrap();
        let output = output_of(&mut shell);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Background Processes:");
        assert!(lines[1].starts_with("PID: ") && lines[1].ends_with(" - Command: sleep"));
        assert!(lines[2].ends_with(" - Command: tail"));

        shell.jobs_mut().terminate_all();
    }
}
