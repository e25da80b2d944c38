//! Configuration file handling: command trees declared in YAML or JSON

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::command::{Command, CommandId};
use crate::commands::tree::CommandTree;
use crate::shell::ShellCommand;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file found in current directory or its parents: {0}")]
    ConfigNotFound(PathBuf),
    #[error("Unable to find directory: {path:?} (entry: {entry:?})")]
    DirectoryNotFound {
        entry: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unknown working directory: {0}")]
    UnknownWorkingDirectory(String),
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Duplicate command name '{name}' under '{parent}'")]
    DuplicateName { parent: String, name: String },
    #[error("Invalid config: {0}")]
    Validation(String),
}

/// A command entry, possibly with nested subcommands
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ConfigCommand {
    #[serde(rename = "use")]
    pub usage: String,
    pub short: Option<String>,
    pub long: Option<String>,
    /// Shell command run with the residual arguments as `$@`
    pub run: Option<String>,
    pub cwd: Option<PathBuf>,
    pub env: Option<HashMap<String, String>>,
    pub commands: Option<Vec<ConfigCommand>>,
}

impl ConfigCommand {
    /// The first word of the usage line
    #[must_use]
    pub fn name(&self) -> &str {
        self.usage.split_whitespace().next().unwrap_or_default()
    }

    #[must_use]
    pub fn subcommands(&self) -> &[ConfigCommand] {
        self.commands.as_deref().unwrap_or_default()
    }

    /// Insert this entry and its subcommands into `tree`, returning the entry's id.
    pub fn build(self, tree: &mut CommandTree) -> CommandId {
        let mut command = Command::new(self.usage)
            .short(self.short.unwrap_or_default())
            .long(self.long.unwrap_or_default());
        if let Some(cmd) = self.run {
            command = command.action(
                ShellCommand {
                    cmd,
                    cwd: self.cwd.unwrap_or_default(),
                    env: self.env.unwrap_or_default(),
                }
                .into(),
            );
        }
        let id = tree.insert(command);
        let children: Vec<CommandId> = self
            .commands
            .unwrap_or_default()
            .into_iter()
            .map(|child| child.build(tree))
            .collect();
        tree.add_command(id, &children);
        id
    }
}

/// Root configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub cmdtree_version: Option<String>,
    #[serde(flatten)]
    pub root: ConfigCommand,
}

/// List of supported configuration file names
const FILENAMES: [&str; 3] = [".cmdtree.json", ".cmdtree.yaml", ".cmdtree.yml"];

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file cannot be read, or
    /// `ConfigError::Yaml`/`ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(file)
            .map_err(|_| ConfigError::ConfigNotFound(file.to_path_buf()))?;
        let config: Config = if file.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        Ok(config)
    }

    /// Searches for a configuration file in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownWorkingDirectory` if the cwd cannot be determined,
    /// or `ConfigError::ConfigNotFound` if no config file is found.
    pub fn find_config() -> Result<PathBuf, ConfigError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::UnknownWorkingDirectory(e.to_string()))?;
        Self::find_config_from(&cwd)
    }

    /// Searches for a configuration file in `start` and its parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if no config file is found.
    pub fn find_config_from(start: &Path) -> Result<PathBuf, ConfigError> {
        let mut path = start.to_path_buf();
        debug!("Searching for config file in {}", start.display());
        loop {
            for file in &FILENAMES {
                let config_path = path.join(file);
                if config_path.exists() {
                    info!("Found config file: {}", config_path.display());
                    return Ok(config_path);
                }
            }
            if !path.pop() {
                return Err(ConfigError::ConfigNotFound(start.to_path_buf()));
            }
        }
    }
}
