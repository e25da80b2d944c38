use log::debug;
use thiserror::Error;

use crate::commands::command::{Action, ActionError, CommandId};
use crate::commands::tree::CommandTree;

/// Errors that can occur while dispatching a command
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Called execute on a command that is not part of this tree: {0:?}")]
    NilCommand(CommandId),
    /// The resolved command has no action; its help should be shown instead
    #[error("help requested")]
    HelpRequested,
    /// Error returned by the command's own action, passed through unchanged
    #[error(transparent)]
    Action(ActionError),
}

impl CommandTree {
    /// Run the command tree below `id` against the process arguments.
    ///
    /// # Errors
    ///
    /// See [`CommandTree::execute_with`].
    pub fn execute(&mut self, id: CommandId) -> Result<(), ExecuteError> {
        self.execute_with(id, std::env::args().skip(1))
    }

    /// Resolve `args` (or the arguments set with [`CommandTree::set_args`]) below `id`
    /// and run the command they select.
    ///
    /// A command without an action has its help rendered instead, which counts as
    /// success.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::NilCommand` if `id` is not part of this tree, the
    /// action's error as `ExecuteError::Action`, or `ExecuteError::HelpRequested` if
    /// help rendering was disabled with [`CommandTree::set_help_on_not_runnable`].
    pub fn execute_with<I, S>(&mut self, id: CommandId, args: I) -> Result<(), ExecuteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.contains(id) {
            return Err(ExecuteError::NilCommand(id));
        }
        self.init_default_help_cmd(id);
        let args: Vec<String> = match &self[id].args {
            Some(preset) => preset.clone(),
            None => args.into_iter().map(Into::into).collect(),
        };
        let (target, flags) = self.find(id, &args);
        match self.dispatch(target, &flags) {
            Err(ExecuteError::HelpRequested) if self.help_on_not_runnable => {
                debug!("'{}' is not runnable, showing help", self.command_path(target));
                let help = self.help_func(target);
                help(self, target, &args);
                Ok(())
            }
            result => result,
        }
    }

    /// Run the action of `id` with `args`, without resolving subcommands.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::NilCommand` if `id` is not part of this tree,
    /// `ExecuteError::HelpRequested` if the command has no action, or the action's own
    /// error.
    pub fn dispatch(&self, id: CommandId, args: &[String]) -> Result<(), ExecuteError> {
        let Some(command) = self.get(id) else {
            return Err(ExecuteError::NilCommand(id));
        };
        debug!("Running '{}' with args {args:?}", self.command_path(id));
        match &command.action {
            None => Err(ExecuteError::HelpRequested),
            Some(Action::RunE(run)) => run(self, id, args).map_err(ExecuteError::Action),
            Some(Action::Run(run)) => {
                run(self, id, args);
                Ok(())
            }
        }
    }
}
