use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs one external program to completion. Returns its exit code
/// (`None` when it was killed by a signal).
pub trait Launcher {
    fn launch(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<Option<i32>>;
}

/// Spawns the real process and blocks until it exits.
#[derive(Clone, Debug, Default)]
pub struct SystemLauncher {
    /// Let mothur's own console output through instead of discarding it.
    pub echo_stdout: bool,
}

impl Launcher for SystemLauncher {
    fn launch(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<Option<i32>> {
        let stdout = if self.echo_stdout { Stdio::inherit() } else { Stdio::null() };
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(stdout)
            .status()?;
        Ok(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemLauncher::default()
            .launch("definitely-not-a-real-mothur-binary", &[], dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
