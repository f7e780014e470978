use anyhow::{anyhow, Context};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells::*};
use cli::{Commands, Procsim};
use procsim::core::job::JobSpec;
use procsim::core::scheduler::Scheduler;
use std::fs;
use std::io;

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Procsim::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbosity)
        .init();

    if let Some(Commands::Completions { shell }) = args.command {
        let mut cmd = Procsim::command();
        match shell {
            cli::Shell::Bash => generate(Bash, &mut cmd, "procsim", &mut io::stdout()),
            cli::Shell::Zsh => generate(Zsh, &mut cmd, "procsim", &mut io::stdout()),
            cli::Shell::Fish => generate(Fish, &mut cmd, "procsim", &mut io::stdout()),
            cli::Shell::Powershell => generate(PowerShell, &mut cmd, "procsim", &mut io::stdout()),
            cli::Shell::Elvish => generate(Elvish, &mut cmd, "procsim", &mut io::stdout()),
        }
        return Ok(());
    }

    let mut config =
        procsim::config::load_config(args.config.as_ref()).context("failed to load configuration")?;
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(quantum) = args.quantum {
        config.quantum = quantum;
    }

    let jobs_path = args
        .jobs
        .ok_or_else(|| anyhow!("a job list file is required unless generating completions"))?;
    let raw = fs::read_to_string(&jobs_path)
        .with_context(|| format!("reading job list {jobs_path:?}"))?;
    let job_specs: Vec<JobSpec> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing job list {jobs_path:?} as JSON"))?;

    tracing::debug!(
        job_count = job_specs.len(),
        strategy = %config.strategy,
        quantum = config.quantum,
        "starting simulation"
    );

    let scheduler = Scheduler::new(job_specs, config.strategy, config.quantum)?;
    let output = scheduler.run()?;

    for event in &output.trace {
        println!("{event}");
    }
    println!("{}", output.statistics);

    Ok(())
}
