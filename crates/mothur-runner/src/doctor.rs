use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use crate::Config;

/// Which program a batch would be handed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    OnPath(PathBuf),
    Local(PathBuf),
}

/// Resolve the executable the same way the runner does: the configured
/// name first, then the local fallback relative to `workdir`.
///
/// Only looks at the file system; mothur itself is not started, since an
/// unexpected argument drops it into interactive mode.
pub fn doctor(workdir: &Path, cfg: &Config) -> Result<Resolved> {
    let exe = cfg.executable();
    if let Some(found) = find_program(&exe, workdir) {
        return Ok(Resolved::OnPath(found));
    }
    let fallback = cfg.local_fallback();
    let local = workdir.join(&fallback);
    if local.is_file() {
        return Ok(Resolved::Local(local));
    }
    Err(anyhow!(
        "mothur not found: `{}` is not on PATH and `{}` does not exist",
        exe,
        local.display()
    ))
}

fn find_program(program: &str, workdir: &Path) -> Option<PathBuf> {
    let p = Path::new(program);
    if p.components().count() > 1 {
        let candidate = if p.is_absolute() { p.to_path_buf() } else { workdir.join(p) };
        return candidate.is_file().then_some(candidate);
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).map(|dir| dir.join(program)).find(|c| c.is_file())
}
