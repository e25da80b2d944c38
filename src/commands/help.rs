use std::fmt::Write as _;
use std::io::Write as _;
use std::rc::Rc;

use log::{debug, warn};

use crate::commands::command::{Action, Command, CommandId, HelpFunc};
use crate::commands::tree::CommandTree;

/// Render `cmd` as: long description, usage line, then the subcommand listing.
pub(crate) fn default_help(tree: &CommandTree, cmd: CommandId, _args: &[String]) {
    let command = &tree[cmd];
    let mut text = String::new();
    if !command.long.is_empty() {
        let _ = writeln!(text, "{}", command.long);
    }
    if !command.usage.is_empty() {
        let _ = writeln!(text, "Usage:");
        let _ = writeln!(text, "  {}\n", command.usage);
    }
    if !command.children.is_empty() {
        let _ = writeln!(text, "Available Commands:");
        for &child in &command.children {
            let child = &tree[child];
            let _ = writeln!(text, "  {:<10} {}", child.name(), child.short);
        }
        let _ = writeln!(text);
        let _ = writeln!(
            text,
            "Use \"{} help [command] \" for more information about a command.",
            command.name()
        );
    }
    let _ = tree.output().write_all(text.as_bytes());
}

/// Format arguments the way the unknown topic message shows them: [`a` `b`]
fn quote_args(args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|arg| format!("`{arg}`")).collect();
    format!("[{}]", quoted.join(" "))
}

fn help_command_action(tree: &CommandTree, cmd: CommandId, args: &[String]) {
    let root = tree.root(cmd);
    let (target, rest) = tree.find(root, args);
    if target == root && !rest.is_empty() {
        warn!("Unknown help topic {rest:?}");
        let _ = writeln!(tree.output(), "Unknown help topic {}", quote_args(&rest));
        return;
    }
    let help = tree.help_func(target);
    help(tree, target, &[]);
}

impl CommandTree {
    /// The help function of `id`: its own override, the nearest ancestor's, or the
    /// built-in renderer.
    #[must_use]
    pub fn help_func(&self, id: CommandId) -> HelpFunc {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|current| self[current].help_func.clone())
            .unwrap_or_else(|| Rc::clone(&self.default_help))
    }

    /// Give `id` a `help` subcommand, unless it has no subcommands at all.
    ///
    /// The help command is created once and moved to the end of the children on every
    /// call.
    pub fn init_default_help_cmd(&mut self, id: CommandId) {
        if self[id].children.is_empty() {
            return;
        }
        let existing = self[id].help_command;
        let help = match existing {
            Some(help) => help,
            None => {
                let long = format!(
                    "Help provides help for any command in the application.\n\
                     Simply type {} help [path to command] for full details.",
                    self[id].name()
                );
                let help = self.insert(
                    Command::new("help [command]")
                        .short("Help about any command")
                        .long(long)
                        .action(Action::run(help_command_action)),
                );
                debug!("Installed help command for '{}'", self[id].name());
                self[id].help_command = Some(help);
                help
            }
        };
        self.upsert_child(id, help);
    }
}
