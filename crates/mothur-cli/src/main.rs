use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mothur_core::CurrentState;
use mothur_runner::{doctor, Config, Orchestrator, Resolved, SystemLauncher};

#[derive(Parser)]
#[command(name = "mothurmagic", version)]
struct Cli {
    /// Working directory for mothur, its logfiles and the saved state
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a block of mothur commands (one per line) as a single batch
    Run {
        /// Commands; read from --file or stdin when omitted
        commands: Vec<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Do not load or save mothur_current.json
        #[arg(long)]
        no_persist: bool,
        /// Don't inject set.current(...) when the first command already is one
        #[arg(long)]
        skip_explicit_set_current: bool,
        /// Show mothur's own console output as well
        #[arg(long)]
        echo: bool,
    },

    /// Print the saved current files and directories
    State,

    /// Forget all saved current files and directories
    Reset,

    /// Write a default mothurmagic.toml
    Init,

    /// Check which mothur executable would be used
    Doctor,
}

fn print_state(state: &CurrentState) {
    println!("current files:");
    for (k, v) in &state.files {
        println!("  {}={}", k, v);
    }
    println!("current dirs:");
    for (k, v) in &state.dirs {
        println!("  {}={}", k, v);
    }
}

fn read_cell(commands: Vec<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()));
    }
    if !commands.is_empty() {
        return Ok(commands.join("\n"));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).context("read commands from stdin")?;
    Ok(buf)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let workdir = match cli.dir {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    let mut cfg = Config::load_or_default(&workdir)?;
    tracing::debug!(workdir = %workdir.display(), "loaded config");

    match cli.cmd {
        Command::Run { commands, file, no_persist, skip_explicit_set_current, echo } => {
            if no_persist {
                cfg.state.persist = false;
            }
            if skip_explicit_set_current {
                cfg.batch.skip_explicit_set_current = true;
            }
            let cell = read_cell(commands, file)?;

            let mut orch = Orchestrator::open(workdir, cfg, SystemLauncher { echo_stdout: echo });
            let loaded = orch.load_state();
            if let Some(notice) = &loaded.notice {
                eprintln!("{}", notice);
            }

            let out = orch.run_cell(&cell, loaded.state);
            for line in &out.display.lines {
                println!("{}", line);
            }
            for notice in &out.notices {
                eprintln!("{}", notice);
            }
            if !out.output_files.is_empty() {
                println!();
                println!("output files:");
                for (ext, name) in &out.output_files {
                    println!("  {}={}", ext, name);
                }
            }
            println!();
            print_state(&out.state);
        }
        Command::State => {
            let orch = Orchestrator::open(workdir, cfg, SystemLauncher::default());
            let loaded = orch.load_state();
            if let Some(notice) = &loaded.notice {
                eprintln!("{}", notice);
            }
            print_state(&loaded.state);
        }
        Command::Reset => {
            let orch = Orchestrator::open(workdir, cfg, SystemLauncher::default());
            orch.reset()?;
            println!("Cleared saved state in {}", orch.store().describe());
        }
        Command::Init => {
            let path = Config::config_path(&workdir);
            if path.exists() {
                println!("{} already exists", path.display());
            } else {
                cfg.save_to(&path)?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Doctor => match doctor(&workdir, &cfg)? {
            Resolved::OnPath(p) => println!("OK: {}", p.display()),
            Resolved::Local(p) => println!("OK (local copy): {}", p.display()),
        },
    }

    Ok(())
}
