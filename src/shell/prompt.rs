//! Prompt and welcome banner.

use nix::unistd::{self, User};

const UNKNOWN: &str = "unknown";

/// Name of the user running the shell, `unknown` if it cannot be looked up.
pub fn username() -> String {
    match User::from_uid(unistd::getuid()) {
        Ok(Some(user)) => user.name,
        Ok(None) => UNKNOWN.to_string(),
        Err(e) => {
            warn!("unable to look up user: {}", e);
            UNKNOWN.to_string()
        }
    }
}

/// Name of the host, `unknown` if it cannot be looked up.
pub fn hostname() -> String {
    unistd::gethostname()
        .map_err(|e| warn!("unable to get hostname: {}", e))
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// `user@host> `
pub fn prompt() -> String {
    format!("{}@{}> ", username(), hostname())
}

/// Greeting shown when an interactive session starts.
pub fn welcome_banner() -> String {
    format!(
        "\n\n*** Welcome to IMCSH ***\n\
         Type 'quit' to exit the shell.\n\
         Enjoy!\n\n\
         Logged in as: {}@{}\n",
        username(),
        hostname()
    )
}
