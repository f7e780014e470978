use crate::core::Strategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SimConfig {
    #[serde(default = "default_strategy")]
    pub strategy: Strategy,
    #[serde(default = "default_quantum")]
    pub quantum: u64,
}

fn default_strategy() -> Strategy {
    Strategy::Infinite
}

fn default_quantum() -> u64 {
    1
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            quantum: default_quantum(),
        }
    }
}

/// Layers an optional explicit TOML file under environment variables
/// prefixed `PROCSIM_` (e.g. `PROCSIM_QUANTUM=4`), the same order
/// `gflow::config::load_config` uses. CLI flags, applied by the caller after
/// this returns, take precedence over both.
pub fn load_config(config_path: Option<&PathBuf>) -> Result<SimConfig, config::ConfigError> {
    let mut settings = config::Config::builder();

    if let Some(config_path) = config_path {
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path.as_path()));
        } else {
            eprintln!("Warning: Config file {config_path:?} not found.");
        }
    }

    settings
        .add_source(
            config::Environment::with_prefix("PROCSIM")
                .separator("_")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_infinite_and_quantum_one() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.strategy, Strategy::Infinite);
        assert_eq!(cfg.quantum, 1);
    }

    #[test]
    fn missing_file_falls_back_to_env_and_defaults() {
        let cfg = load_config(None).expect("env-only load should not fail");
        assert_eq!(cfg, SimConfig::default());
    }
}
