//! Process launcher.
//!
//! Children are created with `fork(2)`. Output redirection happens in the child, between the
//! fork and the `execvp(3)`, so a redirect target that cannot be opened only ever fails the
//! child and never the shell itself.

use std::ffi::{CStr, CString};
use std::fmt;
use std::io;
use std::process::ExitStatus;

use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use crate::errors::{ErrorKind, Result};
use crate::util::ImcshExitStatusExt;

/// Exit status of a child whose program could not be found or executed.
pub const COMMAND_NOT_FOUND_EXIT_STATUS: i32 = 127;
/// Exit status of a child whose redirect target could not be opened.
pub const REDIRECT_FAILED_EXIT_STATUS: i32 = 1;

const REDIRECT_FAILED_MESSAGE: &[u8] = b"Error: Could not open file for redirection.\n";

/// OS process identifier of a spawned child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessId(i32);

impl ProcessId {
    /// The raw pid.
    pub fn as_raw(self) -> i32 {
        self.0
    }
}

impl From<Pid> for ProcessId {
    fn from(pid: Pid) -> Self {
        ProcessId(pid.as_raw())
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A process the shell is responsible for.
pub trait Process {
    /// The process id.
    fn id(&self) -> ProcessId;

    /// Collects the exit status if the process has finished, without blocking.
    fn try_wait(&mut self) -> Result<Option<ExitStatus>>;

    /// Blocks until the process has finished.
    fn wait(&mut self) -> Result<ExitStatus>;

    /// Asks the process to terminate (SIGTERM). Does not wait for it to exit.
    fn terminate(&mut self) -> Result<()>;
}

/// A child process created by [`spawn_process`].
///
/// Dropping a `ChildProcess` neither waits for nor signals the child.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
    status: Option<ExitStatus>,
}

impl ChildProcess {
    fn new(pid: Pid) -> Self {
        Self { pid, status: None }
    }
}

impl Process for ChildProcess {
    fn id(&self) -> ProcessId {
        self.pid.into()
    }

    fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        if self.status.is_some() {
            return Ok(self.status);
        }

        let wait_status = wait::waitpid(self.pid, Some(WaitPidFlag::WNOHANG))?;
        self.status = exit_status(wait_status);
        Ok(self.status)
    }

    fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }

        loop {
            match wait::waitpid(self.pid, None) {
                Ok(wait_status) => {
                    if let Some(status) = exit_status(wait_status) {
                        debug!("{} finished with {}", self.pid, status);
                        self.status = Some(status);
                        return Ok(status);
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn terminate(&mut self) -> Result<()> {
        debug!("sending SIGTERM to {}", self.pid);
        signal::kill(self.pid, Signal::SIGTERM)?;
        Ok(())
    }
}

/// Maps a `waitpid` result to an exit status, `None` while the child is still running.
fn exit_status(wait_status: WaitStatus) -> Option<ExitStatus> {
    match wait_status {
        WaitStatus::Exited(_, code) => Some(ExitStatus::from_status(code)),
        WaitStatus::Signaled(_, signal, _) => Some(ExitStatus::from_signal(signal as i32)),
        _ => None,
    }
}

/// Spawns `argv[0]` with arguments `argv`, looking the program up on `PATH`.
///
/// If `outfile` is given, the child's standard output is bound to it (created with mode
/// 0644 if missing, truncated otherwise). Failing to open the file or to execute the program
/// is reported by the child itself, on its standard output, and through its exit status
/// ([`REDIRECT_FAILED_EXIT_STATUS`], [`COMMAND_NOT_FOUND_EXIT_STATUS`]).
///
/// Only the failure to create the process at all is returned as `SpawnFailed`.
///
/// # Panics
/// Panics if `argv` is empty.
pub fn spawn_process<S: AsRef<str>>(argv: &[S], outfile: Option<&str>) -> Result<ChildProcess> {
    assert!(!argv.is_empty(), "spawn_process called without a program");
    let argv: Vec<&str> = argv.iter().map(|arg| arg.as_ref()).collect();
    let program = argv[0];

    // Everything the child needs is prepared before forking.
    let args = argv
        .iter()
        .map(|&arg| CString::new(arg))
        .collect::<::std::result::Result<Vec<_>, _>>()?;
    let outfile = outfile.map(CString::new).transpose()?;
    let not_found_message = format!("Command not found: {}\n", program);

    // Safety: the child only performs redirection, exec, write and `libc::_exit` before its
    // image is replaced or it terminates. `_exit` skips atexit handlers and never flushes the
    // parent's buffered output a second time.
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Parent { child }) => {
            info!("spawned {} for {:?} (redirect: {:?})", child, argv, outfile);
            Ok(ChildProcess::new(child))
        }
        Ok(ForkResult::Child) => {
            exec_child(&args, outfile.as_deref(), not_found_message.as_bytes())
        }
        Err(e) => {
            error!("fork failed for {}: {}", program, e);
            Err(ErrorKind::SpawnFailed(program.to_string()).into())
        }
    }
}

/// Runs in the child: applies the redirect and replaces the process image.
fn exec_child(args: &[CString], outfile: Option<&CStr>, not_found_message: &[u8]) -> ! {
    if let Some(outfile) = outfile {
        if redirect_stdout(outfile).is_err() {
            let _ = unistd::write(io::stdout(), REDIRECT_FAILED_MESSAGE);
            unsafe { libc::_exit(REDIRECT_FAILED_EXIT_STATUS) }
        }
    }

    // execvp only returns on failure
    let _ = unistd::execvp(&args[0], args);
    let _ = unistd::write(io::stdout(), not_found_message);
    unsafe { libc::_exit(COMMAND_NOT_FOUND_EXIT_STATUS) }
}

/// Replaces standard output with `path`. The opened descriptor is closed on return, leaving
/// only the duplicate on stdout.
fn redirect_stdout(path: &CStr) -> nix::Result<()> {
    let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
    let fd = fcntl::open(path, OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC, mode)?;
    unistd::dup2_stdout(&fd)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::os::unix::process::ExitStatusExt;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_foreground_success() {
        let mut child = spawn_process(&["true"], None).unwrap();
        assert!(child.wait().unwrap().success());
        // the status is cached once collected
        assert!(child.try_wait().unwrap().unwrap().success());
    }

    #[test]
    fn test_exit_code_is_collected() {
        let mut child = spawn_process(&["sh", "-c", "exit 3"], None).unwrap();
        assert_eq!(child.wait().unwrap().code(), Some(3));
    }

    #[test]
    fn test_redirect_creates_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let mut child =
            spawn_process(&["echo", "hello", "world"], Some(out.to_str().unwrap())).unwrap();
        assert!(child.wait().unwrap().success());
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello world\n");

        let mode = fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn test_redirect_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        fs::write(&out, "a much longer previous content\n").unwrap();
        let mut child = spawn_process(&["echo", "hi"], Some(out.to_str().unwrap())).unwrap();
        child.wait().unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "hi\n");
    }

    #[test]
    fn test_redirect_open_failure_exits_child() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("missing").join("out.txt");
        let mut child = spawn_process(&["echo", "hi"], Some(out.to_str().unwrap())).unwrap();
        assert_eq!(
            child.wait().unwrap().code(),
            Some(REDIRECT_FAILED_EXIT_STATUS)
        );
        assert!(!out.exists());
    }

    #[test]
    fn test_command_not_found() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let mut child = spawn_process(
            &["imcsh-definitely-not-a-program"],
            Some(out.to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(
            child.wait().unwrap().code(),
            Some(COMMAND_NOT_FOUND_EXIT_STATUS)
        );
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "Command not found: imcsh-definitely-not-a-program\n"
        );
    }

    #[test]
    fn test_terminate_running_child() {
        let mut child = spawn_process(&["sleep", "30"], None).unwrap();
        assert_eq!(child.try_wait().unwrap(), None);
        child.terminate().unwrap();
        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(Signal::SIGTERM as i32));
    }

    #[test]
    fn test_nul_byte_is_rejected_before_fork() {
        assert!(spawn_process(&["echo", "a\0b"], None).is_err());
    }
}
