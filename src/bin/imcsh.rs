extern crate imcsh;
#[macro_use]
extern crate log;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::{self, ExitStatus};

use docopt::Docopt;
use imcsh::errors::*;
use imcsh::shell::prompt;
use imcsh::{ImcshExitStatusExt, Shell, ShellConfig};
use nix::unistd::Pid;
use serde::Deserialize;

const LOG_FILE_NAME: &str = ".imcsh_log";

const USAGE: &str = "
imcsh.

Usage:
    imcsh [options]
    imcsh [options] -c <command>
    imcsh (-h | --help)
    imcsh --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    -c              Execute <command> as a single input line, then exit.
    --jobs=<n>      Maximum number of tracked background jobs [default: 10].
    --log=<path>    File to write log to, defaults to ~/.imcsh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_jobs: usize,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if let Err(e) = init_logger(&args.flag_log) {
        eprintln!("imcsh: logging disabled: {}", e);
    }
    debug!("{:?}", args);

    if args.flag_version {
        println!("imcsh version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let code = match args.arg_command {
        Some(ref command) if args.flag_c => execute_command_string(&args, command),
        _ => execute_from_stdin(&args),
    };
    process::exit(code);
}

fn init_logger(path: &Option<String>) -> Result<()> {
    let log_path = match *path {
        Some(ref path) => PathBuf::from(path),
        None => dirs::home_dir()
            .ok_or("unable to get home directory")?
            .join(LOG_FILE_NAME),
    };

    let pid = Pid::this();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(fern::log_file(log_path)?)
        .apply()?;
    Ok(())
}

fn execute_command_string(args: &Args, command: &str) -> i32 {
    let config = ShellConfig::noninteractive().with_job_capacity(args.flag_jobs);
    let mut shell = Shell::new(config, io::stdin().lock(), io::stdout());
    match shell.execute_command_string(command) {
        Ok(_) => 0,
        Err(e) => display_error(&e),
    }
}

fn execute_from_stdin(args: &Args) -> i32 {
    let config = if io::stdin().is_terminal() {
        print!("{}", prompt::welcome_banner());
        ShellConfig::interactive()
    } else {
        ShellConfig::noninteractive()
    };
    let config = config.with_job_capacity(args.flag_jobs);

    let mut shell = Shell::new(config, io::stdin().lock(), io::stdout());
    match shell.execute_from_input() {
        Ok(()) => 0,
        Err(e) => display_error(&e),
    }
}

fn display_error(error: &Error) -> i32 {
    error!("imcsh failed: {}", error);
    eprintln!("imcsh: {}", error);
    ExitStatus::from_failure().code().unwrap_or(1)
}
