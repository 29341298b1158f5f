use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::directive::{batch_argument, SEPARATOR};

/// Symbolic key to path, e.g. `fasta -> seqs.fa` or `output -> /tmp/out/`.
pub type PathMap = BTreeMap<String, String>;

/// Directory roles mothur tracks, with the header each is reported under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirRole {
    Input,
    Output,
    TempDefault,
}

impl DirRole {
    pub const ALL: [DirRole; 3] = [DirRole::Input, DirRole::Output, DirRole::TempDefault];

    /// Key used both in `set.dir(...)` and in the persisted `dirs` map.
    pub fn key(self) -> &'static str {
        match self {
            DirRole::Input => "input",
            DirRole::Output => "output",
            DirRole::TempDefault => "tempdefault",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            DirRole::Input => "Current input directory saved by mothur:",
            DirRole::Output => "Current output directory saved by mothur:",
            DirRole::TempDefault => "Current default directory saved by mothur:",
        }
    }
}

/// Mirror of mothur's current files and directories.
///
/// A missing key means unset; empty values are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    #[serde(rename = "current", default)]
    pub files: PathMap,
    #[serde(default)]
    pub dirs: PathMap,
}

impl CurrentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Key-wise overwrite. Keys absent from the update are kept.
    pub fn merge(&mut self, files: PathMap, dirs: PathMap) {
        merge_into(&mut self.files, files);
        merge_into(&mut self.dirs, dirs);
    }

    pub fn merge_from(&mut self, update: CurrentState) {
        self.merge(update.files, update.dirs);
    }
}

fn merge_into(target: &mut PathMap, update: PathMap) {
    for (k, v) in update {
        if k.is_empty() || v.is_empty() {
            continue;
        }
        target.insert(k, v);
    }
}

/// Commands as submitted by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandBatch(Vec<String>);

impl CommandBatch {
    pub fn new(commands: Vec<String>) -> Self {
        Self(commands)
    }

    /// One command per line; blank lines are dropped and commands trimmed.
    pub fn from_cell(raw: &str) -> Self {
        Self(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn commands(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The batch actually submitted: prelude, user commands, query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewrittenBatch {
    pub prelude: Vec<String>,
    pub user: Vec<String>,
    pub query: String,
}

impl RewrittenBatch {
    pub fn commands(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.prelude.iter().cloned());
        out.extend(self.user.iter().cloned());
        out.push(self.query.clone());
        out
    }

    pub fn len(&self) -> usize {
        self.prelude.len() + self.user.len() + 1
    }

    /// `#set.logfile(name=...); ...` argument for the executable.
    pub fn to_argument(&self, logfile: &str) -> String {
        batch_argument(logfile, &self.commands())
    }

    /// Commands joined without the logfile directive, for logging.
    pub fn joined(&self) -> String {
        self.commands().join(SEPARATOR)
    }
}
