//! Background job registry.
//!
//! Jobs are kept in spawn order. Removal shifts later jobs down so `bglist` keeps showing
//! earlier-spawned jobs first.

use std::fmt;
use std::process::ExitStatus;

use crate::errors::{ErrorKind, Result};
use crate::execute_command::{ChildProcess, Process, ProcessId};

/// Number of background jobs tracked when no capacity is configured.
pub const DEFAULT_JOB_CAPACITY: usize = 10;

/// A background job the shell is responsible for.
#[derive(Debug)]
pub struct Job<P = ChildProcess> {
    process: P,
    /// The program name the job was started with.
    command: String,
}

impl<P: Process> Job<P> {
    /// The job's process id.
    pub fn id(&self) -> ProcessId {
        self.process.id()
    }

    /// The program name the job was started with.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl<P: Process> fmt::Display for Job<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PID: {} - Command: {}", self.id(), self.command)
    }
}

/// A job that was found to have finished.
#[derive(Debug)]
pub struct CompletedJob {
    /// Process id the job had.
    pub id: ProcessId,
    /// The program name the job was started with.
    pub command: String,
    /// Exit status, `None` if it could not be collected.
    pub status: Option<ExitStatus>,
}

/// Bounded, ordered collection of background jobs.
#[derive(Debug)]
pub struct JobRegistry<P = ChildProcess> {
    jobs: Vec<Job<P>>,
    capacity: usize,
}

impl<P: Process> Default for JobRegistry<P> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOB_CAPACITY)
    }
}

impl<P: Process> JobRegistry<P> {
    /// Creates an empty registry tracking at most `capacity` jobs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of tracked jobs.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if no jobs are tracked.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Tracks `process`, labelled with `command`.
    ///
    /// When the registry is full the process is not tracked, but it keeps running.
    pub fn register<S: Into<String>>(&mut self, process: P, command: S) -> Result<()> {
        let id = process.id();
        if self.jobs.len() >= self.capacity {
            warn!("registry full ({}), {} is untracked", self.capacity, id);
            return Err(ErrorKind::RegistryFull(self.capacity).into());
        }
        if self.jobs.iter().any(|job| job.id() == id) {
            return Err(ErrorKind::DuplicateJob(id.as_raw()).into());
        }

        let command = command.into();
        debug!("tracking background job {} ({})", id, command);
        self.jobs.push(Job { process, command });
        Ok(())
    }

    /// Removes and returns every job whose process has finished. Never blocks.
    ///
    /// A job whose status cannot be collected is dropped as well, since its pid can no longer
    /// be trusted.
    pub fn poll_completed(&mut self) -> Vec<CompletedJob> {
        let mut completed = Vec::new();
        let mut index = 0;
        while index < self.jobs.len() {
            let status = match self.jobs[index].process.try_wait() {
                Ok(None) => {
                    index += 1;
                    continue;
                }
                Ok(Some(status)) => Some(status),
                Err(e) => {
                    warn!("unable to poll job {}: {}", self.jobs[index].id(), e);
                    None
                }
            };

            let job = self.jobs.remove(index);
            info!("background job {} ({}) finished: {:?}", job.id(), job.command, status);
            completed.push(CompletedJob {
                id: job.id(),
                command: job.command,
                status,
            });
        }

        completed
    }

    /// Tracked jobs, in spawn order.
    pub fn jobs(&self) -> &[Job<P>] {
        &self.jobs
    }

    /// Sends SIGTERM to every tracked job and forgets all of them. Does not wait for the
    /// processes to exit.
    pub fn terminate_all(&mut self) {
        for mut job in self.jobs.drain(..) {
            let id = job.id();
            let temp_result = job.process.terminate();
            log_if_err!(temp_result, "failed to terminate {} ({})", id, job.command);
        }
    }
}
