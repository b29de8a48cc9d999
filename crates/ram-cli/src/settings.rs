//! JSON configuration loading and command-line overrides.

use std::path::Path;

use ram_core::SimulatorConfig;

use crate::source::read;
use crate::CliError;

/// Option values given on the command line. They win over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--debug`: interactive stepping.
    pub debug: bool,
    /// `--logging`: render a frame before every step.
    pub logging: bool,
    /// `--max-instructions <n>`.
    pub max_instructions: Option<usize>,
}

impl ConfigOverrides {
    /// Applies the flags that were given on top of `config`.
    #[must_use]
    pub fn apply(self, mut config: SimulatorConfig) -> SimulatorConfig {
        config.debug |= self.debug;
        config.logging |= self.logging;
        if let Some(limit) = self.max_instructions {
            config.max_instructions = limit;
        }
        config
    }
}

/// Reads a configuration file. Missing keys keep their defaults.
///
/// # Errors
///
/// Returns [`CliError::Read`] or [`CliError::ConfigSyntax`] (which also
/// covers unknown keys).
pub fn load_config(path: &Path) -> Result<SimulatorConfig, CliError> {
    let text = read(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::ConfigSyntax {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the optional file, applies overrides and validates the result.
///
/// # Errors
///
/// Propagates loading errors and returns [`CliError::Config`] for values out
/// of range.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<SimulatorConfig, CliError> {
    let base = path.map_or_else(|| Ok(SimulatorConfig::default()), load_config)?;
    let config = overrides.apply(base);
    config.validate()?;
    log::debug!("effective configuration: {config:?}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ram_core::{ConfigError, SimulatorConfig};

    use super::{load_config, resolve_config, ConfigOverrides};
    use crate::CliError;

    #[test]
    fn camel_case_keys_fill_the_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ram.json");
        fs::write(
            &path,
            r#"{ "maxInstructions": 50, "logging": true, "timeoutSeconds": 0.5, "numOfLinesLogged": 3 }"#,
        )
        .expect("write config");

        let config = load_config(&path).expect("valid config");
        assert_eq!(
            config,
            SimulatorConfig {
                max_instructions: 50,
                logging: true,
                debug: false,
                timeout_seconds: 0.5,
                num_of_lines_logged: 3,
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ram.json");
        fs::write(&path, r#"{ "maxInstruction": 5 }"#).expect("write config");

        let error = load_config(&path).expect_err("typo in key");
        assert!(matches!(error, CliError::ConfigSyntax { .. }));
        assert!(error.to_string().contains("maxInstruction"));
    }

    #[test]
    fn flags_override_the_file_and_are_validated() {
        let overrides = ConfigOverrides {
            debug: true,
            logging: false,
            max_instructions: Some(12),
        };
        let config = resolve_config(None, overrides).expect("valid overrides");
        assert!(config.debug);
        assert!(config.renders());
        assert_eq!(config.max_instructions, 12);

        let zero = ConfigOverrides {
            max_instructions: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            resolve_config(None, zero),
            Err(CliError::Config(ConfigError::ZeroInstructionLimit))
        ));
    }
}
