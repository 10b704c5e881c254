use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Check and search proofs in natural deduction, tableaux and sequent calculi
///
/// The input file contains a JSON object with the fields
/// "goal" (the inference, metainferential label or sequent to be proven),
/// "proof" (a derivation or tree, required for checking), and
/// "premises" (sequents that may close branches, for sequent calculi only).
///
/// Set the environment variable "LOG" to "info", "debug", or "trace"
/// to obtain an increasingly detailed log.
#[derive(Parser)]
#[command(version)]
pub struct Cli {
    /// Proof format
    #[arg(value_enum)]
    pub engine: Engine,

    /// Check a given proof or search for one
    #[arg(value_enum)]
    pub command: Command,

    /// Name of the proof system
    ///
    /// Natural deduction: "classical", "classical-alt".
    /// Tableaux: "classical", "classical-indexed", "fde", "k3", "lp", "constructive".
    /// Metainferential tableaux: "sk", "wk".
    /// Sequent calculi: "lk", "lk-min", "lk-min-ea".
    #[arg(long)]
    pub system: Option<String>,

    /// Use only invertible rules, by reordering the expansion of tableau rules
    #[arg(long)]
    pub invertible: bool,

    /// Maximal search depth
    #[arg(long)]
    pub lim: Option<usize>,

    /// Stop checking at the first error
    #[arg(long)]
    pub exit_on_first_error: bool,

    /// Write SZS output (such as proofs and error details) to given file
    #[arg(short)]
    pub output: Option<PathBuf>,

    /// Write proof statistics in JSON format to given file
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Path of the JSON problem file
    pub file: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Engine {
    /// natural deduction
    Nd,
    Tableaux,
    /// metainferential tableaux
    Meta,
    Sequent,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Command {
    Check,
    Solve,
}

/// Size of a proof.
#[derive(Serialize)]
pub struct Stats {
    /// number of steps or nodes
    pub size: usize,
    /// number of nodes on the longest branch, zero for derivations
    pub height: usize,
}

impl Cli {
    pub fn system(&self, default: &'static str) -> &str {
        self.system.as_deref().unwrap_or(default)
    }

    pub fn output(&self, out: impl std::fmt::Display) -> Result<(), std::io::Error> {
        match &self.output {
            Some(o) => std::fs::write(o, out.to_string()),
            None => write!(std::io::stdout(), "{}", crate::szs::Output(out)),
        }
    }

    pub fn stats(&self, stats: Stats) -> Result<(), crate::Error> {
        if let Some(file) = &self.stats {
            let mut f = File::create(file)?;
            serde_json::to_writer(&mut f, &stats)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
