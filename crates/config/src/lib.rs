//! Configuration management for Warden
//!
//! This crate provides functionality for managing the Warden configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::Error;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use warden_common::utils::{
    env::home_dir,
    io::file::{delete_path, read_file, write_file},
    strings::parse_word,
};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "warden config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    pub key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    pub value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. Commands read their
/// defaults from it, and command line flags take precedence over it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Milliseconds a run may take before `timing_check` reports a timing anomaly
    pub timing_threshold_ms: u64,

    /// Maximum instructions per run. Zero means unlimited.
    pub step_limit: u64,

    /// Mask used to derive the authentication failure id from the success id
    pub failure_id_mask: i32,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration { timing_threshold_ms: 2000, step_limit: 0, failure_id_mask: 0x5A5A5A5A }
    }
}

/// Returns the path of the configuration file, `$HOME/.warden/config.toml`.
pub fn config_path() -> Result<PathBuf, Error> {
    let mut home = home_dir().ok_or_else(|| {
        Error::Generic("failed to get home directory. is `$HOME` set?".to_string())
    })?;
    home.push(".warden");
    home.push("config.toml");
    Ok(home)
}

fn path_str(path: &Path) -> Result<&str, Error> {
    path.to_str().ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

impl Configuration {
    /// Returns the current configuration, writing the defaults to disk if no configuration
    /// exists yet.
    pub fn load() -> Result<Self, Error> {
        let path = config_path()?;

        // if the config file doesn't exist, create it
        if !path.exists() {
            debug!("no configuration at {}, writing defaults", path.display());
            let config = Configuration::default();
            config.save()?;
        }

        // read the config file
        let contents = read_file(path_str(&path)?)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        // parse the config file
        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        let path = config_path()?;

        write_file(
            path_str(&path)?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.warden/config.toml`.
    pub fn delete() -> Result<(), Error> {
        let path = config_path()?;
        delete_path(path_str(&path)?);
        Ok(())
    }

    /// Update a single key/value pair in the configuration, and write it to disk.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "timing_threshold_ms" => {
                self.timing_threshold_ms = value.parse::<u64>().map_err(|_| {
                    Error::ParseError(format!("'{value}' is not a valid number of milliseconds."))
                })?;
            }
            "step_limit" => {
                self.step_limit = value.parse::<u64>().map_err(|_| {
                    Error::ParseError(format!("'{value}' is not a valid step limit."))
                })?;
            }
            "failure_id_mask" => {
                let mask = parse_word(value).map_err(|e| Error::ParseError(e.to_string()))?;
                if mask == 0 {
                    return Err(Error::ParseError(
                        "failure_id_mask must be non-zero, or the success and failure ids collide."
                            .to_string(),
                    ));
                }
                self.failure_id_mask = mask;
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }

    /// The timing threshold as a [`Duration`].
    pub fn timing_threshold(&self) -> Duration {
        Duration::from_millis(self.timing_threshold_ms)
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `warden config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `warden config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.timing_threshold_ms, 2000);
        assert_eq!(config.step_limit, 0);
        assert_eq!(config.failure_id_mask, 0x5A5A5A5A);
        assert_eq!(config.timing_threshold(), Duration::from_secs(2));
    }

    #[test]
    #[serial]
    fn test_load_configuration() {
        // delete config file if it exists
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
        assert!(config_path().expect("config path").exists());
    }

    #[test]
    #[serial]
    fn test_save_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        config.update("step_limit", "5000").expect("failed to update step_limit");
        config.update("failure_id_mask", "0x1234").expect("failed to update failure_id_mask");

        let loaded_config = Configuration::load().expect("failed to load config file");
        assert_eq!(loaded_config.step_limit, 5000);
        assert_eq!(loaded_config.failure_id_mask, 0x1234);
        assert_eq!(loaded_config.timing_threshold_ms, 2000);

        Configuration::delete().expect("failed to delete config file");
    }

    #[test]
    #[serial]
    fn test_update_rejects_bad_values() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        assert!(config.update("timing_threshold_ms", "soon").is_err());
        assert!(config.update("step_limit", "-1").is_err());
        assert!(config.update("failure_id_mask", "0").is_err());
        assert!(config.update("rpc_url", "http://localhost:8545").is_err());
        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: Configuration =
            toml::from_str("step_limit = 10\n").expect("failed to parse partial config");
        assert_eq!(config.step_limit, 10);
        assert_eq!(config.timing_threshold_ms, 2000);
    }

    #[test]
    #[serial]
    fn test_delete_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");
        config.update("timing_threshold_ms", "10").expect("failed to update threshold");

        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");
        assert_eq!(config.timing_threshold_ms, 2000);
    }
}
