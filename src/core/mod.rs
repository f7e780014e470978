pub mod error;
pub mod job;
pub mod memory;
pub mod queue;
pub mod scheduler;
pub mod stats;
pub mod trace;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const VERSION_MESSAGE: &str = concat!(env!("CARGO_PKG_VERSION"));

pub fn version() -> &'static str {
    let author = clap::crate_authors!();

    Box::leak(Box::new(format!(
        "\
{VERSION_MESSAGE}
Authors: {author}"
    )))
}

/// The memory allocation strategy, selected once at startup and never
/// changed mid-run. Maps to the tagged variant in [`memory::MemoryManager`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[clap(rename_all = "kebab-case")]
pub enum Strategy {
    Infinite,
    FirstFit,
    Paged,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Infinite => write!(f, "infinite"),
            Strategy::FirstFit => write!(f, "first-fit"),
            Strategy::Paged => write!(f, "paged"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "infinite" => Ok(Strategy::Infinite),
            "first-fit" | "firstfit" | "first_fit" => Ok(Strategy::FirstFit),
            "paged" => Ok(Strategy::Paged),
            other => Err(format!(
                "unknown strategy {other:?}, expected infinite, first-fit, or paged"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_round_trips_through_display_and_from_str() {
        for strategy in [Strategy::Infinite, Strategy::FirstFit, Strategy::Paged] {
            let parsed: Strategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!("virtual".parse::<Strategy>().is_err());
    }
}
