use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_LOG_PREFIX: &str = "mothur.ipython";
const MAX_ATTEMPTS: usize = 64;

#[derive(Debug, Error)]
pub enum NameError {
    #[error("no free transcript name in {} after {attempts} attempts", dir.display())]
    Exhausted {
        dir: PathBuf,
        attempts: usize,
        /// Last candidate drawn; callers may still use it.
        last: String,
    },
}

/// `<prefix>.<5 digits>.logfile`
pub fn transcript_name(prefix: &str, suffix: u32) -> String {
    format!("{}.{:05}.logfile", prefix, suffix)
}

/// Uniform draw from 10000..=99999.
pub fn random_suffix() -> u32 {
    (Uuid::new_v4().as_u128() % 90_000) as u32 + 10_000
}

/// Hands out transcript names that neither exist on disk nor were issued
/// before by this allocator.
#[derive(Debug)]
pub struct TranscriptNamer {
    dir: PathBuf,
    prefix: String,
    issued: HashSet<String>,
    draw: fn() -> u32,
}

impl TranscriptNamer {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self { dir: dir.into(), prefix: prefix.into(), issued: HashSet::new(), draw: random_suffix }
    }

    pub fn with_draw(mut self, draw: fn() -> u32) -> Self {
        self.draw = draw;
        self
    }

    pub fn allocate(&mut self) -> Result<String, NameError> {
        let draw = self.draw;
        self.allocate_with(draw)
    }

    pub fn allocate_with(&mut self, mut draw: impl FnMut() -> u32) -> Result<String, NameError> {
        let mut last = String::new();
        for _ in 0..MAX_ATTEMPTS {
            let candidate = transcript_name(&self.prefix, draw());
            if !self.issued.contains(&candidate) && !self.dir.join(&candidate).exists() {
                self.issued.insert(candidate.clone());
                return Ok(candidate);
            }
            last = candidate;
        }
        Err(NameError::Exhausted { dir: self.dir.clone(), attempts: MAX_ATTEMPTS, last })
    }
}
