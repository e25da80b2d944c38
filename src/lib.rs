//! Nested subcommand routing for command-line tools
//!
//! A program describes its commands as a tree (`app remote add <name> <url>`), and
//! cmdtree resolves the leading argument tokens against that tree, runs the deepest
//! matching command with the leftover tokens, and renders help for commands that have
//! nothing to run. Help functions are inherited down the tree, and the executed
//! command gets a `help` subcommand when it has subcommands.
//!
//! Trees are either built in code with [`CommandTree`] or declared in a config file
//! whose commands run shell snippets, see [`load_config`].

use std::collections::HashSet;
use std::path::PathBuf;

use log::{debug, warn};

use crate::commands::inherit::{Inheritable, Inheritance};
use crate::config_file::{Config, ConfigCommand, ConfigError};

pub mod commands;
pub mod config_file;
pub mod logger;
pub mod shell;

pub use crate::commands::command::{Action, ActionError, Command, CommandId, HelpFunc};
pub use crate::commands::execute::ExecuteError;
pub use crate::commands::tree::CommandTree;

/// Load configuration from a file (or auto-detect), returning the command tree, its
/// root and the config file path.
///
/// # Errors
///
/// Returns `ConfigError` if the config file is not found, cannot be parsed,
/// contains invalid values, or references non-existent directories.
pub fn load_config(
    config_file: Option<&str>,
) -> Result<(CommandTree, CommandId, PathBuf), ConfigError> {
    let config_path = match config_file {
        Some(file) => {
            let config_path = PathBuf::from(file);
            if !config_path.exists() {
                return Err(ConfigError::ConfigNotFound(config_path));
            }
            config_path
        }
        None => Config::find_config()?,
    };
    let cwd = config_path
        .parent()
        .ok_or_else(|| ConfigError::ConfigNotFound(config_path.clone()))?
        .to_path_buf();
    debug!(
        "Building command tree from config file: {} (cwd: {})",
        config_path.display(),
        cwd.display()
    );
    let parsed = Config::from_file(&config_path)?;
    if let Some(version) = &parsed.cmdtree_version {
        validate_version(version);
    }
    let mut root = parsed.root;
    validate_tree(&root)?;
    root.inherit(&Inheritance::from(cwd))?;

    let mut tree = CommandTree::new();
    let root = root.build(&mut tree);
    Ok((tree, root, config_path))
}

/// Warn if the config's `cmdtree_version` doesn't match the binary version
fn validate_version(config_version: &str) {
    let binary_version = env!("CARGO_PKG_VERSION");
    if config_version != binary_version {
        warn!(
            "Config cmdtree_version '{config_version}' differs from binary version '{binary_version}'"
        );
    }
}

/// Validate the config tree for empty names, clashing siblings and empty `run` entries
fn validate_tree(root: &ConfigCommand) -> Result<(), ConfigError> {
    check_empty_names(root)?;
    check_duplicate_names(root)?;
    check_empty_runs(root)?;
    check_unrunnable_leaves(root);
    Ok(())
}

fn check_empty_names(command: &ConfigCommand) -> Result<(), ConfigError> {
    for child in command.subcommands() {
        if child.name().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Command under '{}' has an empty name",
                command.name()
            )));
        }
        check_empty_names(child)?;
    }
    Ok(())
}

fn check_duplicate_names(command: &ConfigCommand) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for child in command.subcommands() {
        if !seen.insert(child.name()) {
            return Err(ConfigError::DuplicateName {
                parent: command.name().to_string(),
                name: child.name().to_string(),
            });
        }
        check_duplicate_names(child)?;
    }
    Ok(())
}

fn check_empty_runs(command: &ConfigCommand) -> Result<(), ConfigError> {
    if command.run.as_deref().is_some_and(|run| run.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "Command '{}' has an empty run string",
            command.name()
        )));
    }
    for child in command.subcommands() {
        check_empty_runs(child)?;
    }
    Ok(())
}

fn check_unrunnable_leaves(command: &ConfigCommand) {
    for child in command.subcommands() {
        if child.run.is_none() && child.subcommands().is_empty() {
            warn!("Command '{}' has nothing to run and no subcommands", child.name());
        }
        check_unrunnable_leaves(child);
    }
}
