//! Line-oriented scans over a mothur logfile.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::directive::PROMPT;
use crate::model::{CurrentState, DirRole, PathMap, RewrittenBatch};

pub const FILES_HEADER: &str = "Current files saved by mothur:";
pub const OUTPUT_FILES_HEADER: &str = "Output File Names:";
pub const DEFAULT_DISPLAY_LIMIT: usize = 1000;

/// Full output of one batch invocation. Read once, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    path: PathBuf,
    lines: Vec<String>,
}

impl Transcript {
    pub fn read(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_text(path, &String::from_utf8_lossy(&bytes)))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self { path: path.into(), lines: text.lines().map(str::to_string).collect() }
    }

    /// Stand-in for a transcript that was never written.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lines: Vec::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as mothur was told to write it.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lines shown to the user for one invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplaySlice {
    pub lines: Vec<String>,
    /// Set when the slice hit the line cap; names the transcript file.
    pub truncated: Option<String>,
}

impl DisplaySlice {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.truncated.is_none()
    }
}

fn is_header(line: &str) -> bool {
    line.contains(FILES_HEADER)
        || line.contains(OUTPUT_FILES_HEADER)
        || DirRole::ALL.iter().any(|r| line.contains(r.header()))
}

/// A block of entries ends at a blank line, an echoed command or another header.
fn ends_block(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with(PROMPT) || is_header(line)
}

fn dir_on_line(line: &str, role: DirRole) -> Option<String> {
    let at = line.find(role.header())?;
    line[at + role.header().len()..].split_whitespace().last().map(str::to_string)
}

/// Recover current files and directories from `get.current()` output.
///
/// Later reports in the same transcript win.
pub fn extract_state(transcript: &Transcript) -> CurrentState {
    let lines = transcript.lines();
    let mut files = PathMap::new();
    let mut dirs = PathMap::new();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];

        for role in DirRole::ALL {
            if let Some(path) = dir_on_line(line, role) {
                dirs.insert(role.key().to_string(), path);
            }
        }

        if line.contains(FILES_HEADER) {
            i += 1;
            while i < lines.len() && !ends_block(&lines[i]) {
                if let Some((k, v)) = lines[i].split_once('=') {
                    let (k, v) = (k.trim(), v.trim());
                    if !k.is_empty() && !v.is_empty() {
                        files.insert(k.to_string(), v.to_string());
                    }
                }
                i += 1;
            }
            continue;
        }
        i += 1;
    }

    debug!(files = files.len(), dirs = dirs.len(), transcript = %transcript.name(), "extracted state");
    let mut state = CurrentState::new();
    state.merge(files, dirs);
    state
}

/// Files listed under `Output File Names:`, keyed by extension.
pub fn extract_output_files(transcript: &Transcript) -> PathMap {
    let lines = transcript.lines();
    let mut out = PathMap::new();

    let mut i = 0;
    while i < lines.len() {
        if !lines[i].contains(OUTPUT_FILES_HEADER) {
            i += 1;
            continue;
        }
        i += 1;
        while i < lines.len() && !ends_block(&lines[i]) {
            if let Some(file) = lines[i].split_whitespace().next() {
                if let Some((_, ext)) = file.rsplit_once('.') {
                    if !ext.is_empty() {
                        out.insert(ext.to_string(), file.to_string());
                    }
                }
            }
            i += 1;
        }
    }
    out
}

fn echoes(line: &str, command: &str) -> bool {
    line.strip_prefix(PROMPT)
        .map(|rest| rest.trim() == command.trim())
        .unwrap_or(false)
}

/// Slice from the echo of the first user command up to (not including)
/// the echo of the query command, capped at `limit` lines.
///
/// Injected commands that happen to read exactly like the first user
/// command are skipped so their echoes never open the slice.
pub fn extract_display(transcript: &Transcript, batch: &RewrittenBatch, limit: usize) -> DisplaySlice {
    let Some(first) = batch.user.first() else {
        return DisplaySlice::default();
    };
    let lines = transcript.lines();

    let skip = batch.prelude.iter().filter(|c| c.trim() == first.trim()).count();
    let Some(start) = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| echoes(l, first))
        .map(|(i, _)| i)
        .nth(skip)
    else {
        debug!(transcript = %transcript.name(), command = %first, "first command not echoed in transcript");
        return DisplaySlice::default();
    };

    let end_marker = format!("{}{}", PROMPT, batch.query);
    let mut slice = DisplaySlice::default();
    for (offset, line) in lines[start..].iter().enumerate() {
        if offset > 0 && line.contains(&end_marker) {
            break;
        }
        if slice.lines.len() == limit {
            slice.truncated = Some(format!(
                "output exceeded {} lines. See logfile {} for complete output.",
                limit,
                transcript.name()
            ));
            break;
        }
        slice.lines.push(line.trim_end().to_string());
    }
    slice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommandBatch, RewrittenBatch};
    use crate::rewrite::{rewrite, RewriteOptions};

    fn t(text: &str) -> Transcript {
        Transcript::from_text("mothur.ipython.12345.logfile", text)
    }

    fn batch(cmds: &[&str]) -> RewrittenBatch {
        let b = CommandBatch::new(cmds.iter().map(|s| s.to_string()).collect());
        rewrite(&b, &CurrentState::new(), RewriteOptions::default())
    }

    #[test]
    fn read_tolerates_non_utf8_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mothur.ipython.12345.logfile");
        let mut bytes = b"mothur > summary.seqs(fasta=current)\nUsing caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b".fa as input file for the fasta parameter.\nmothur > get.current()\n\n");
        bytes.extend_from_slice(b"Current files saved by mothur:\nfasta=seqs.fa\nsummary=seqs.summary\n\n");
        std::fs::write(&path, bytes).unwrap();

        let transcript = Transcript::read(&path).unwrap();
        let state = extract_state(&transcript);
        assert_eq!(state.files["fasta"], "seqs.fa");
        assert_eq!(state.files["summary"], "seqs.summary");

        let slice = extract_display(&transcript, &batch(&["summary.seqs(fasta=current)"]), DEFAULT_DISPLAY_LIMIT);
        assert_eq!(slice.lines.len(), 2);
        assert!(slice.lines[1].starts_with("Using caf"));
    }

    #[test]
    fn extracts_current_files_block() {
        let state = extract_state(&t("Current files saved by mothur:\nA=foo.txt\nB=bar.txt\n\nC=ignored.txt\n"));
        assert_eq!(state.files.len(), 2);
        assert_eq!(state.files["A"], "foo.txt");
        assert_eq!(state.files["B"], "bar.txt");
        assert!(state.dirs.is_empty());
    }

    #[test]
    fn extracts_directories_by_role() {
        let text = "Current input directory saved by mothur: /data/in/\n\
                    Current output directory saved by mothur: /tmp/out\n\
                    Current default directory saved by mothur: /opt/mothur/\n";
        let state = extract_state(&t(text));
        assert_eq!(state.dirs["input"], "/data/in/");
        assert_eq!(state.dirs["output"], "/tmp/out");
        assert_eq!(state.dirs["tempdefault"], "/opt/mothur/");
    }

    #[test]
    fn directory_header_without_path_is_ignored() {
        let state = extract_state(&t("Current output directory saved by mothur:\n"));
        assert!(state.dirs.is_empty());
    }

    #[test]
    fn file_block_splits_on_first_equals_and_stops_at_echo() {
        let text = "Current files saved by mothur:\nfasta=a=b.fa\nnot a pair\nmothur > quit()\nname=late.names\n";
        let state = extract_state(&t(text));
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files["fasta"], "a=b.fa");
    }

    #[test]
    fn file_block_at_end_of_input() {
        let state = extract_state(&t("Current files saved by mothur:\nfasta=x.fa"));
        assert_eq!(state.files["fasta"], "x.fa");
    }

    #[test]
    fn missing_headers_yield_empty_state() {
        let state = extract_state(&t("mothur > summary.seqs()\n[ERROR]: no fasta file\n"));
        assert!(state.is_empty());
    }

    #[test]
    fn files_and_dirs_in_one_pass() {
        let text = "mothur > get.current()\n\nCurrent input directory saved by mothur: /in/\n\
                    Current files saved by mothur:\nfasta=a.fa\nCurrent output directory saved by mothur: /out/\n";
        let state = extract_state(&t(text));
        assert_eq!(state.files["fasta"], "a.fa");
        assert_eq!(state.dirs["input"], "/in/");
        assert_eq!(state.dirs["output"], "/out/");
    }

    #[test]
    fn output_files_keyed_by_extension() {
        let text = "Output File Names: \nseqs.summary\nseqs.trim.fasta  \n\nother.txt\n";
        let files = extract_output_files(&t(text));
        assert_eq!(files.len(), 2);
        assert_eq!(files["summary"], "seqs.summary");
        assert_eq!(files["fasta"], "seqs.trim.fasta");
    }

    #[test]
    fn display_spans_user_commands_only() {
        let text = "mothur > set.current()\n\
                    mothur > summary.seqs(fasta=current)\n\
                    Using 1 processors.\n\
                    \n\
                    mothur > get.current()\n\
                    Current files saved by mothur:\n";
        let slice = extract_display(&t(text), &batch(&["summary.seqs(fasta=current)"]), DEFAULT_DISPLAY_LIMIT);
        assert_eq!(slice.lines, vec!["mothur > summary.seqs(fasta=current)", "Using 1 processors.", ""]);
        assert!(slice.truncated.is_none());
    }

    #[test]
    fn display_without_start_marker_is_empty() {
        let slice = extract_display(&t("mothur > set.current()\nmothur > get.current()\n"), &batch(&["help()"]), 10);
        assert!(slice.is_empty());
    }

    #[test]
    fn display_without_user_commands_is_empty() {
        let slice = extract_display(&t("mothur > get.current()\n"), &batch(&[]), 10);
        assert!(slice.is_empty());
    }

    #[test]
    fn display_is_capped_with_notice() {
        let mut text = String::from("mothur > help()\n");
        for i in 0..1500 {
            text.push_str(&format!("line {}\n", i));
        }
        text.push_str("mothur > get.current()\n");
        let slice = extract_display(&t(&text), &batch(&["help()"]), DEFAULT_DISPLAY_LIMIT);
        assert_eq!(slice.lines.len(), 1000);
        let notice = slice.truncated.unwrap();
        assert!(notice.contains("mothur.ipython.12345.logfile"));
    }

    #[test]
    fn display_exactly_at_cap_is_not_truncated() {
        let mut text = String::from("mothur > help()\n");
        for i in 0..4 {
            text.push_str(&format!("line {}\n", i));
        }
        text.push_str("mothur > get.current()\n");
        let slice = extract_display(&t(&text), &batch(&["help()"]), 5);
        assert_eq!(slice.lines.len(), 5);
        assert!(slice.truncated.is_none());
    }

    #[test]
    fn display_skips_injected_duplicate_of_first_command() {
        let text = "mothur > set.current()\nmothur > set.current()\nreal output\nmothur > get.current()\n";
        let slice = extract_display(&t(text), &batch(&["set.current()"]), 10);
        assert_eq!(slice.lines, vec!["mothur > set.current()", "real output"]);
    }
}
