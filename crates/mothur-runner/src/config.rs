use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use mothur_core::{RewriteOptions, DEFAULT_DISPLAY_LIMIT, DEFAULT_LOG_PREFIX};
use mothur_store::DEFAULT_STATE_FILE;

pub const CONFIG_FILE: &str = "mothurmagic.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub executable: String,
    /// Tried when `executable` is not on PATH.
    pub local_fallback: String,
    pub log_prefix: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub file: String,
    pub persist: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub skip_explicit_set_current: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_lines: usize,
    pub keep_transcripts: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            executable: "mothur".to_string(),
            local_fallback: "./mothur".to_string(),
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self { file: DEFAULT_STATE_FILE.to_string(), persist: true }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { max_lines: DEFAULT_DISPLAY_LIMIT, keep_transcripts: true }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// `mothurmagic.toml` in `workdir` if present, defaults otherwise.
    pub fn load_or_default(workdir: &Path) -> Result<Self> {
        let path = Self::config_path(workdir);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(workdir: &Path) -> PathBuf {
        workdir.join(CONFIG_FILE)
    }

    pub fn state_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(shellexpand::tilde(&self.state.file).into_owned())
    }

    pub fn executable(&self) -> String {
        shellexpand::tilde(&self.tool.executable).to_string()
    }

    pub fn local_fallback(&self) -> String {
        shellexpand::tilde(&self.tool.local_fallback).to_string()
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions { skip_explicit_set_current: self.batch.skip_explicit_set_current }
    }
}
