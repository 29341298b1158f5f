use std::io;
use std::path::PathBuf;

use mothur_core::{NameError, RewrittenBatch, TranscriptNamer};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::launcher::{Launcher, SystemLauncher};

#[derive(Debug, Error)]
pub enum InvocationFailure {
    #[error("can't open mothur: neither `{executable}` nor `{fallback}` could be found")]
    NotFound { executable: String, fallback: String },
    #[error("something went wrong while starting `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
}

/// Where the transcript of one invocation was (or should have been) written.
#[derive(Debug)]
pub struct TranscriptHandle {
    pub name: String,
    pub path: PathBuf,
    pub program: Option<String>,
    pub exit_code: Option<i32>,
    pub failure: Option<InvocationFailure>,
}

/// Submits a rewritten batch as one synchronous mothur call.
pub struct ProcessRunner<L: Launcher = SystemLauncher> {
    launcher: L,
    executable: String,
    local_fallback: String,
    workdir: PathBuf,
    namer: TranscriptNamer,
}

impl<L: Launcher> ProcessRunner<L> {
    pub fn new(launcher: L, cfg: &Config, workdir: PathBuf) -> Self {
        Self {
            launcher,
            executable: cfg.executable(),
            local_fallback: cfg.local_fallback(),
            namer: TranscriptNamer::new(workdir.clone(), cfg.tool.log_prefix.clone()),
            workdir,
        }
    }

    /// Replace the suffix source used for transcript names.
    pub fn with_draw(mut self, draw: fn() -> u32) -> Self {
        self.namer = self.namer.with_draw(draw);
        self
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Never fails: launch problems are carried in the handle so callers
    /// can report "no output" and keep going.
    pub fn run(&mut self, batch: &RewrittenBatch) -> TranscriptHandle {
        let name = match self.namer.allocate() {
            Ok(name) => name,
            Err(NameError::Exhausted { last, attempts, .. }) => {
                warn!(attempts, name = %last, "no unused transcript name found; reusing last candidate");
                last
            }
        };
        let path = self.workdir.join(&name);
        let args = vec![batch.to_argument(&name)];
        info!(logfile = %name, commands = batch.len(), "running mothur");

        let mut handle = TranscriptHandle { name, path, program: None, exit_code: None, failure: None };

        let outcome = match self.launcher.launch(&self.executable, &args, &self.workdir) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(executable = %self.executable, fallback = %self.local_fallback, "mothur not on PATH; trying local copy");
                match self.launcher.launch(&self.local_fallback, &args, &self.workdir) {
                    Ok(code) => Ok((self.local_fallback.clone(), code)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Err(InvocationFailure::NotFound {
                        executable: self.executable.clone(),
                        fallback: self.local_fallback.clone(),
                    }),
                    Err(source) => Err(InvocationFailure::Spawn { program: self.local_fallback.clone(), source }),
                }
            }
            Err(source) => Err(InvocationFailure::Spawn { program: self.executable.clone(), source }),
            Ok(code) => Ok((self.executable.clone(), code)),
        };

        match outcome {
            Ok((program, code)) => {
                match code {
                    Some(0) => info!(program = %program, "mothur finished"),
                    Some(c) => warn!(program = %program, exit_code = c, "mothur exited with non-zero status"),
                    None => warn!(program = %program, "mothur was terminated by a signal"),
                }
                handle.program = Some(program);
                handle.exit_code = code;
            }
            Err(failure) => {
                warn!(error = %failure, "mothur invocation failed");
                handle.failure = Some(failure);
            }
        }
        handle
    }
}
