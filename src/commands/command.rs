use std::fmt;
use std::rc::Rc;

use crate::commands::tree::CommandTree;

/// Error type returned by fallible actions and passed through `execute` untouched.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Plain action: receives the tree, the resolved command and the residual arguments.
pub type RunFn = Rc<dyn Fn(&CommandTree, CommandId, &[String])>;

/// Fallible action, see [`RunFn`].
pub type RunEFn = Rc<dyn Fn(&CommandTree, CommandId, &[String]) -> Result<(), ActionError>>;

/// Renders help for a command. Shared by reference so overrides can be compared with
/// [`Rc::ptr_eq`].
pub type HelpFunc = Rc<dyn Fn(&CommandTree, CommandId, &[String])>;

/// Handle to a command stored in a [`CommandTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

/// The work a command performs once it has been resolved
#[derive(Clone)]
pub enum Action {
    Run(RunFn),
    RunE(RunEFn),
}

impl Action {
    pub fn run(f: impl Fn(&CommandTree, CommandId, &[String]) + 'static) -> Self {
        Action::Run(Rc::new(f))
    }

    pub fn run_e(
        f: impl Fn(&CommandTree, CommandId, &[String]) -> Result<(), ActionError> + 'static,
    ) -> Self {
        Action::RunE(Rc::new(f))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Run(_) => f.write_str("Action::Run"),
            Action::RunE(_) => f.write_str("Action::RunE"),
        }
    }
}

/// A single node of the command tree.
///
/// The first word of `usage` is the command's name, which is what argument tokens are
/// matched against. Tree links are owned by the [`CommandTree`] and only change
/// through its mutators.
#[derive(Clone, Default)]
pub struct Command {
    /// One-line usage message, e.g. `add [-F file | -D dir]... profile`
    pub usage: String,
    /// Shown next to the name in the parent's command listing
    pub short: String,
    /// Shown at the top of this command's help
    pub long: String,
    pub action: Option<Action>,
    pub(crate) help_func: Option<HelpFunc>,
    pub(crate) help_command: Option<CommandId>,
    pub(crate) args: Option<Vec<String>>,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
}

impl Command {
    #[must_use]
    pub fn new(usage: impl Into<String>) -> Self {
        Command {
            usage: usage.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    #[must_use]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn run(self, f: impl Fn(&CommandTree, CommandId, &[String]) + 'static) -> Self {
        self.action(Action::run(f))
    }

    #[must_use]
    pub fn run_e(
        self,
        f: impl Fn(&CommandTree, CommandId, &[String]) -> Result<(), ActionError> + 'static,
    ) -> Self {
        self.action(Action::run_e(f))
    }

    /// The first word of the usage line
    #[must_use]
    pub fn name(&self) -> &str {
        self.usage.split_whitespace().next().unwrap_or_default()
    }

    /// A command is runnable when it has an action to perform.
    #[must_use]
    pub fn runnable(&self) -> bool {
        self.action.is_some()
    }

    #[must_use]
    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    #[must_use]
    pub fn help_command(&self) -> Option<CommandId> {
        self.help_command
    }

    #[must_use]
    pub fn has_help_func(&self) -> bool {
        self.help_func.is_some()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("usage", &self.usage)
            .field("short", &self.short)
            .field("action", &self.action)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
