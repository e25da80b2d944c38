use crate::config_file::{ConfigCommand, ConfigError};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

#[must_use]
pub fn inherit_path(parent: &Path, child: PathBuf) -> PathBuf {
    if child.as_os_str().is_empty() {
        parent.to_path_buf()
    } else if child.is_relative() {
        parent.join(child)
    } else {
        child
    }
}

/// Settings flowing from a command entry down to its subcommands
#[derive(Default, Clone)]
pub struct Inheritance {
    cwd: PathBuf,
    entry_path: Vec<String>,
    env: HashMap<String, String>,
}

impl Inheritance {
    fn canonicalize(&mut self) -> Result<(), io::Error> {
        if !self.cwd.as_os_str().is_empty() {
            self.cwd = self.cwd.canonicalize()?;
        }
        Ok(())
    }

    fn merge_entry_path(&self, entry: &str) -> Vec<String> {
        let mut new_entry_path = self.entry_path.clone();
        new_entry_path.push(entry.to_string());
        new_entry_path
    }
}

impl From<PathBuf> for Inheritance {
    fn from(cwd: PathBuf) -> Self {
        Inheritance {
            cwd,
            ..Default::default()
        }
    }
}

/// A trait for config entries that take settings from their parent entry
pub trait Inheritable: Sized {
    /// Calculate the inheritance state for this item.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the inheritance calculation fails.
    fn calculate_inheritance(&self, inheritance: &Inheritance) -> Result<Inheritance, ConfigError>;

    /// Apply previously calculated inheritance to this item.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if applying inheritance fails.
    fn apply_inheritance(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError>;

    /// Calculate and apply inheritance in one step.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DirectoryNotFound` if a referenced directory does not exist.
    fn inherit(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError> {
        let mut inherited = self.calculate_inheritance(inheritance)?;
        inherited
            .canonicalize()
            .map_err(|e| ConfigError::DirectoryNotFound {
                path: inherited.cwd.clone(),
                entry: inherited.entry_path.join("."),
                source: e,
            })?;
        self.apply_inheritance(&inherited)
    }
}

impl Inheritable for ConfigCommand {
    fn calculate_inheritance(&self, inheritance: &Inheritance) -> Result<Inheritance, ConfigError> {
        let mut env = inheritance.env.clone();
        env.extend(self.env.clone().unwrap_or_default());
        Ok(Inheritance {
            cwd: inherit_path(&inheritance.cwd, self.cwd.clone().unwrap_or_default()),
            entry_path: inheritance.merge_entry_path(self.name()),
            env,
        })
    }

    fn apply_inheritance(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError> {
        self.cwd = Some(inheritance.cwd.clone());
        self.env = Some(inheritance.env.clone());
        for child in self.commands.iter_mut().flatten() {
            child.inherit(inheritance)?;
        }
        Ok(())
    }
}
