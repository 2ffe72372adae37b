//! imcsh Parser
//!
//! Input lines are split on whitespace only: there is no quoting and no escaping. A leading
//! `exec` is dropped, `&` anywhere marks the command as a background job, and `>` takes the
//! following token as the file to redirect standard output to. When `>` appears more than
//! once, the last target wins.

pub use self::ast::Command;

mod ast;

#[allow(deprecated, missing_docs)]
mod errors {
    error_chain! {
        errors {
            /// `>` was the final token of the line
            MissingRedirectTarget {
                description("missing redirect target")
                display("Missing output file after '>'.")
            }
        }
    }
}

pub use self::errors::{Error, ErrorKind, Result};

const EXEC_KEYWORD: &str = "exec";
const BACKGROUND_TOKEN: &str = "&";
const REDIRECT_TOKEN: &str = ">";

impl Command {
    /// Parse `input` according to imcsh grammar:
    /// `[exec] <program> [args...] [&] [> <file>]`
    ///
    /// # Examples
    ///
    /// ```
    /// use imcsh::Command;
    ///
    /// let command = Command::parse("ls -la > out.txt").unwrap();
    /// assert_eq!(command.argv, vec!["ls", "-la"]);
    /// assert_eq!(command.outfile, Some("out.txt".to_string()));
    /// assert!(!command.background);
    /// ```
    pub fn parse(input: &str) -> Result<Command> {
        let mut tokens = input.split_whitespace().peekable();
        if tokens.peek() == Some(&EXEC_KEYWORD) {
            tokens.next();
        }

        let mut command = Command::default();
        while let Some(token) = tokens.next() {
            match token {
                BACKGROUND_TOKEN => command.background = true,
                REDIRECT_TOKEN => {
                    let target = tokens.next().ok_or(ErrorKind::MissingRedirectTarget)?;
                    command.outfile = Some(target.to_string());
                }
                arg => command.argv.push(arg.to_string()),
            }
        }

        trace!("parsed {:?} into {:?}", input, command);
        Ok(command)
    }
}
