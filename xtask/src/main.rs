//! Repo automation tasks for stylegate.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Repo automation tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the local CI suite: fmt, clippy, test.
    Ci,

    /// Generate shell completions into `OUT_DIR`.
    Completions {
        #[arg(long, default_value = "target/completions")]
        out_dir: PathBuf,
    },

    /// Generate the man page into `OUT_DIR`.
    Man {
        #[arg(long, default_value = "target/man")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Ci => ci(),
        Cmd::Completions { out_dir } => completions(&out_dir),
        Cmd::Man { out_dir } => man(&out_dir),
    }
}

fn ci() -> Result<()> {
    run("cargo", &["fmt", "--check"])?;
    run(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    run("cargo", &["test", "--workspace"])?;
    Ok(())
}

fn completions(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).context("create completions output dir")?;
    let mut command = stylegate::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        let path = clap_complete::generate_to(shell, &mut command, "stylegate", out_dir)
            .with_context(|| format!("generate {shell} completions"))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn man(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).context("create man output dir")?;
    let mut buf = Vec::new();
    clap_mangen::Man::new(stylegate::command())
        .render(&mut buf)
        .context("render man page")?;
    let path = out_dir.join("stylegate.1");
    fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn run(cmd: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(cmd)
        .args(args)
        .status()
        .with_context(|| format!("run {cmd} {}", args.join(" ")))?;
    if !status.success() {
        bail!("command failed: {cmd} {}", args.join(" "));
    }
    Ok(())
}
