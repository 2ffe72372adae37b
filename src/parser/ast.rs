/// A single parsed input line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Command {
    /// Program name followed by its arguments. May be empty for a blank line.
    pub argv: Vec<String>,
    /// Run the command in the background, defaults to false
    pub background: bool,
    /// File to write the child's standard output to, if one is specified
    pub outfile: Option<String>,
}

impl Command {
    /// The program to execute, `None` for a blank line.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Returns `true` when there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}
