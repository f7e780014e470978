use clap::{Parser, ValueEnum};
use procsim::core::Strategy;
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

#[derive(Debug, Parser)]
#[command(
    name = "procsim",
    author,
    version = procsim::core::version(),
    about = "A discrete-event simulator of a round-robin process scheduler and its memory allocator."
)]
pub struct Procsim {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON array of jobs: [{"name":"P1","arrival_time":0,"service_time":6,"memory_req":100}, ...]
    pub jobs: Option<PathBuf>,

    /// The configuration file to use
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Memory allocation strategy; overrides the configuration file
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Quantum length in simulated ticks; overrides the configuration file
    #[arg(long)]
    pub quantum: Option<u64>,

    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity,
}

#[derive(Debug, Parser)]
pub enum Commands {
    /// Generate tab-completion scripts for your shell
    Completions {
        /// The shell to generate the completions for
        shell: Shell,
    },
}
