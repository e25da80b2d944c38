use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use log::debug;

use crate::commands::command::{Command, CommandId, HelpFunc};
use crate::commands::help::default_help;

/// Arena holding every command of one program.
///
/// Children are owned through the `children` list of their parent; the parent link is
/// an index back into the arena. Removed commands stay addressable until the tree is
/// dropped.
pub struct CommandTree {
    nodes: Vec<Command>,
    pub(crate) default_help: HelpFunc,
    output: RefCell<Box<dyn Write>>,
    pub(crate) help_on_not_runnable: bool,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    #[must_use]
    pub fn new() -> Self {
        CommandTree {
            nodes: Vec::new(),
            default_help: Rc::new(default_help),
            output: RefCell::new(Box::new(std::io::stdout())),
            help_on_not_runnable: true,
        }
    }

    /// Store a detached command and return its handle.
    pub fn insert(&mut self, mut command: Command) -> CommandId {
        command.parent = None;
        command.children.clear();
        command.help_command = None;
        let id = CommandId(self.nodes.len());
        self.nodes.push(command);
        id
    }

    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: CommandId) -> Option<&mut Command> {
        self.nodes.get_mut(id.0)
    }

    #[must_use]
    pub fn contains(&self, id: CommandId) -> bool {
        id.0 < self.nodes.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self[id].parent
    }

    #[must_use]
    pub fn children(&self, id: CommandId) -> &[CommandId] {
        &self[id].children
    }

    /// Attach `children` to `parent`, in order.
    ///
    /// A child already attached to another command is detached from it first; a child
    /// already attached to `parent` is left where it is.
    ///
    /// # Panics
    ///
    /// Panics if any of `children` is `parent` itself or one of its ancestors. Nothing is
    /// attached in that case.
    pub fn add_command(&mut self, parent: CommandId, children: &[CommandId]) {
        assert!(
            !children.contains(&parent),
            "command can't be a child of itself"
        );
        assert!(
            !self.ancestors(parent).any(|ancestor| children.contains(&ancestor)),
            "command can't be a child of its own descendant"
        );
        for &child in children {
            let current = self[child].parent;
            match current {
                Some(existing) if existing == parent => {
                    debug!(
                        "'{}' is already a child of '{}'",
                        self[child].name(),
                        self[parent].name()
                    );
                    continue;
                }
                Some(previous) => self.remove_command(previous, &[child]),
                None => {}
            }
            self[child].parent = Some(parent);
            self[parent].children.push(child);
        }
    }

    /// Detach `children` from `parent`. Commands that aren't children of `parent` are
    /// ignored.
    pub fn remove_command(&mut self, parent: CommandId, children: &[CommandId]) {
        let (removed, kept): (Vec<CommandId>, Vec<CommandId>) = self[parent]
            .children
            .iter()
            .copied()
            .partition(|child| children.contains(child));
        self[parent].children = kept;
        for child in removed {
            self[child].parent = None;
        }
    }

    /// Attach `child` as the last child of `parent`, moving it there if it is
    /// already attached.
    pub(crate) fn upsert_child(&mut self, parent: CommandId, child: CommandId) {
        self.remove_command(parent, &[child]);
        self.add_command(parent, &[child]);
    }

    /// Parent, grandparent and so on up to the root
    pub fn ancestors(&self, id: CommandId) -> impl Iterator<Item = CommandId> + '_ {
        std::iter::successors(self[id].parent, |&current| self[current].parent)
    }

    /// The top of the tree `id` belongs to
    #[must_use]
    pub fn root(&self, id: CommandId) -> CommandId {
        let mut current = id;
        while let Some(parent) = self[current].parent {
            current = parent;
        }
        current
    }

    /// First child of `id` whose name is `next`
    #[must_use]
    pub fn find_next(&self, id: CommandId, next: &str) -> Option<CommandId> {
        self[id]
            .children
            .iter()
            .copied()
            .find(|&child| self[child].name() == next)
    }

    /// Names from the root down to `id`, joined with spaces
    #[must_use]
    pub fn command_path(&self, id: CommandId) -> String {
        let mut names = vec![self[id].name()];
        let mut current = id;
        while let Some(parent) = self[current].parent {
            names.push(self[parent].name());
            current = parent;
        }
        names.reverse();
        names.join(" ")
    }

    /// Arguments `execute` uses instead of the ones it is given.
    pub fn set_args<I, S>(&mut self, id: CommandId, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self[id].args = Some(args.into_iter().map(Into::into).collect());
    }

    /// Set or clear the help override of `id`.
    pub fn set_help_func(&mut self, id: CommandId, help: Option<HelpFunc>) {
        self[id].help_func = help;
    }

    /// Replace the `help` subcommand installed by `execute`.
    pub fn set_help_command(&mut self, id: CommandId, help: CommandId) {
        if let Some(previous) = self[id].help_command.replace(help) {
            self.remove_command(id, &[previous]);
        }
    }

    /// When disabled, `execute` returns [`ExecuteError::HelpRequested`] for commands
    /// without an action instead of rendering their help.
    ///
    /// [`ExecuteError::HelpRequested`]: crate::commands::execute::ExecuteError::HelpRequested
    pub fn set_help_on_not_runnable(&mut self, enabled: bool) {
        self.help_on_not_runnable = enabled;
    }

    /// Redirect help and diagnostics, stdout by default.
    pub fn set_output(&mut self, output: impl Write + 'static) {
        self.output = RefCell::new(Box::new(output));
    }

    /// # Panics
    ///
    /// Panics if the output is already borrowed, e.g. by an enclosing call in the same
    /// action.
    pub fn output(&self) -> RefMut<'_, Box<dyn Write>> {
        self.output.borrow_mut()
    }
}

impl Index<CommandId> for CommandTree {
    type Output = Command;

    fn index(&self, id: CommandId) -> &Command {
        &self.nodes[id.0]
    }
}

impl IndexMut<CommandId> for CommandTree {
    fn index_mut(&mut self, id: CommandId) -> &mut Command {
        &mut self.nodes[id.0]
    }
}
