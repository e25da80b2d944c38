//! Actions backed by shell commands, as declared in config files

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;
use std::time::Instant;

use log::debug;
use thiserror::Error;

use crate::commands::command::Action;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unable to start `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{cmd}` exited with {}", exit_description(*code))]
    Failed { cmd: String, code: Option<i32> },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}

impl ShellError {
    /// Exit code of the failed command, when it exited normally
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ShellError::Failed { code, .. } => *code,
            ShellError::Spawn { .. } => None,
        }
    }
}

/// A shell snippet run with the residual arguments as its positional parameters
#[derive(Debug, Clone, Default)]
pub struct ShellCommand {
    pub cmd: String,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
}

impl ShellCommand {
    /// Run `sh -c <cmd> sh <args...>`, so `args` are available as `$1`, `$2`, ... and `$@`.
    ///
    /// Standard streams are inherited from the current process.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Spawn` if `sh` cannot be started and `ShellError::Failed`
    /// if the command exits unsuccessfully.
    pub fn run(&self, args: &[String]) -> Result<(), ShellError> {
        let mut process = ProcessCommand::new("sh");
        process.arg("-c").arg(&self.cmd).arg("sh").args(args).envs(&self.env);
        if !self.cwd.as_os_str().is_empty() {
            process.current_dir(&self.cwd);
        }

        let start = Instant::now();
        let status = process.status().map_err(|e| ShellError::Spawn {
            cmd: self.cmd.clone(),
            source: e,
        })?;
        debug!(
            "`{}` finished in {:.2}s with {status}",
            self.cmd,
            start.elapsed().as_secs_f64()
        );

        if status.success() {
            Ok(())
        } else {
            Err(ShellError::Failed {
                cmd: self.cmd.clone(),
                code: status.code(),
            })
        }
    }
}

impl From<ShellCommand> for Action {
    fn from(shell: ShellCommand) -> Self {
        Action::run_e(move |_, _, args| shell.run(args).map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(cmd: &str) -> ShellCommand {
        ShellCommand {
            cmd: cmd.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_success() {
        assert!(shell("true").run(&[]).is_ok());
    }

    #[test]
    fn test_failure_keeps_exit_code() {
        let err = shell("exit 3").run(&[]).unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.to_string(), "`exit 3` exited with status 3");
    }

    #[test]
    fn test_args_are_positional_parameters() {
        let cmd = shell(r#"test "$1" = hello && test "$2" = "two words" && test $# -eq 2"#);
        assert!(cmd.run(&["hello".to_string(), "two words".to_string()]).is_ok());
        assert!(cmd.run(&["bye".to_string()]).is_err());
    }

    #[test]
    fn test_env_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ShellCommand {
            cmd: r#"test "$GREETING" = hi && touch marker"#.to_string(),
            cwd: dir.path().to_path_buf(),
            env: HashMap::from([("GREETING".to_string(), "hi".to_string())]),
        };
        cmd.run(&[]).unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn test_spawn_failure() {
        let cmd = ShellCommand {
            cmd: "true".to_string(),
            cwd: PathBuf::from("/definitely/not/a/real/dir"),
            ..Default::default()
        };
        assert!(matches!(cmd.run(&[]), Err(ShellError::Spawn { .. })));
    }
}
