//! Crate-wide error chain. See the [error-chain](https://crates.io/crates/error-chain) crate
//! for details.

#![allow(deprecated, missing_docs)]

error_chain! {
    links {
        Parse(crate::parser::Error, crate::parser::ErrorKind);
    }

    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
        Nul(::std::ffi::NulError);
        Logger(::log::SetLoggerError);
    }

    errors {
        /// The OS refused to create a new process (e.g. resource exhaustion).
        SpawnFailed(program: String) {
            description("failed to create process")
            display("Failed to fork process.")
        }

        /// The job registry already tracks `capacity` jobs.
        RegistryFull(capacity: usize) {
            description("job registry is full")
            display("Too many background processes.")
        }

        /// A live job with the same process id is already tracked.
        DuplicateJob(pid: i32) {
            description("process is already tracked")
            display("Process {} is already tracked.", pid)
        }
    }
}
