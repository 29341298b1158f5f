use std::path::PathBuf;

use mothur_core::{
    extract_display, extract_output_files, extract_state, rewrite, CommandBatch, CurrentState, DisplaySlice, PathMap,
    Transcript,
};
use mothur_store::{JsonFileStore, MemoryStore, StateStore, StoreError};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::launcher::{Launcher, SystemLauncher};
use crate::process::ProcessRunner;

/// State as loaded at session start, plus a notice when nothing usable was found.
#[derive(Clone, Debug, Default)]
pub struct LoadedState {
    pub state: CurrentState,
    pub notice: Option<String>,
}

/// Everything one cell produced.
#[derive(Debug)]
pub struct CellOutcome {
    pub display: DisplaySlice,
    /// State after merging what this run reported.
    pub state: CurrentState,
    /// What `get.current()` reported in this run alone.
    pub learned: CurrentState,
    pub output_files: PathMap,
    pub transcript: PathBuf,
    pub notices: Vec<String>,
}

pub struct Orchestrator<L: Launcher = SystemLauncher> {
    cfg: Config,
    store: Box<dyn StateStore>,
    runner: ProcessRunner<L>,
}

impl Orchestrator<SystemLauncher> {
    /// Real mothur, state in the configured JSON file (or memory when
    /// persistence is off).
    pub fn open(workdir: PathBuf, cfg: Config, launcher: SystemLauncher) -> Self {
        let store: Box<dyn StateStore> = if cfg.state.persist {
            Box::new(JsonFileStore::new(cfg.state_path(&workdir)))
        } else {
            Box::new(MemoryStore::new())
        };
        let runner = ProcessRunner::new(launcher, &cfg, workdir);
        Self { cfg, store, runner }
    }
}

impl<L: Launcher> Orchestrator<L> {
    pub fn with_parts(cfg: Config, store: Box<dyn StateStore>, runner: ProcessRunner<L>) -> Self {
        Self { cfg, store, runner }
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    pub fn runner(&self) -> &ProcessRunner<L> {
        &self.runner
    }

    /// Falls back to an empty state on any load problem.
    pub fn load_state(&self) -> LoadedState {
        match self.store.load() {
            Ok(state) => LoadedState { state, notice: None },
            Err(e) => {
                let notice = match &e {
                    StoreError::Missing(_) => "no saved mothur state found; starting with no current files".to_string(),
                    other => format!("could not load saved mothur state ({}); starting with no current files", other),
                };
                if e.is_missing() {
                    info!(store = %self.store.describe(), "{}", notice);
                } else {
                    warn!(store = %self.store.describe(), error = %e, "state load failed");
                }
                LoadedState { state: CurrentState::new(), notice: Some(notice) }
            }
        }
    }

    /// Persist an empty state.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.save(&CurrentState::new())
    }

    /// Rewrite, run, parse, merge, save, slice.
    pub fn run_cell(&mut self, raw_commands: &str, state: CurrentState) -> CellOutcome {
        let mut state = state;
        let mut notices = Vec::new();

        let batch = CommandBatch::from_cell(raw_commands);
        let rewritten = rewrite(&batch, &state, self.cfg.rewrite_options());
        debug!(batch = %rewritten.joined(), "rewrote batch");

        let handle = self.runner.run(&rewritten);
        if let Some(failure) = &handle.failure {
            notices.push(failure.to_string());
        }

        let transcript = match Transcript::read(&handle.path) {
            Ok(t) => t,
            Err(e) => {
                warn!(logfile = %handle.path.display(), error = %e, "no transcript to parse");
                notices.push(format!("mothur produced no output (logfile {})", handle.name));
                Transcript::empty(handle.path.clone())
            }
        };

        let learned = extract_state(&transcript);
        if learned.is_empty() {
            debug!("transcript reported no current state; keeping previous state");
        }
        state.merge_from(learned.clone());

        if let Err(e) = self.store.save(&state) {
            warn!(store = %self.store.describe(), error = %e, "state save failed");
            notices.push(format!("could not save mothur state: {}", e));
        }

        let display = extract_display(&transcript, &rewritten, self.cfg.display.max_lines);
        if let Some(notice) = &display.truncated {
            info!(logfile = %handle.name, "display truncated");
            notices.push(notice.clone());
        }
        let output_files = extract_output_files(&transcript);

        if !self.cfg.display.keep_transcripts && display.truncated.is_none() && !transcript.is_empty() {
            if let Err(e) = std::fs::remove_file(&handle.path) {
                debug!(logfile = %handle.path.display(), error = %e, "could not remove transcript");
            }
        }

        let display_lines = display.lines.len();
        info!(files = state.files.len(), dirs = state.dirs.len(), display_lines, "cell complete");

        CellOutcome { display, state, learned, output_files, transcript: handle.path, notices }
    }
}
