use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// imcsh Utility Extensions for `ExitStatus`
pub trait ImcshExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus to indicate *unsuccessful* program execution.
    fn from_failure() -> Self;

    /// Create an ExitStatus from a status code
    fn from_status(code: i32) -> Self;

    /// Create an ExitStatus for a process killed by signal number `signal`
    fn from_signal(signal: i32) -> Self;
}

impl ImcshExitStatusExt for ExitStatus {
    /// # Examples
    /// ```rust
    /// use imcsh::ImcshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_success().success());
    /// ```
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    /// # Examples
    /// ```rust
    /// use imcsh::ImcshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(!ExitStatus::from_failure().success());
    /// ```
    fn from_failure() -> Self {
        ExitStatus::from_status(1)
    }

    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw((code & 0xff) << 8)
    }

    fn from_signal(signal: i32) -> Self {
        ExitStatus::from_raw(signal & 0x7f)
    }
}

/// Cuts `line` down to at most `max_chars` characters.
pub fn truncate_chars(line: &mut String, max_chars: usize) {
    if let Some((index, _)) = line.char_indices().nth(max_chars) {
        line.truncate(index);
    }
}
