use log::debug;

use crate::commands::command::CommandId;
use crate::commands::tree::CommandTree;

/// Remove the first `x` from `args`, wherever it is. Only that occurrence goes, so in
/// `admin policy add-role-to-user admin my-user` the second `admin` survives as an
/// argument.
pub(crate) fn args_minus_first(args: &[String], x: &str) -> Vec<String> {
    let mut rest = args.to_vec();
    if let Some(i) = rest.iter().position(|arg| arg == x) {
        rest.remove(i);
    }
    rest
}

impl CommandTree {
    /// Walk down from `start`, consuming one argument per matched child name.
    ///
    /// Returns the deepest command reached and the arguments that were not consumed.
    /// Resolution stops at the first argument that doesn't name a child of the
    /// current command, so it never fails.
    #[must_use]
    pub fn find(&self, start: CommandId, args: &[String]) -> (CommandId, Vec<String>) {
        let mut current = start;
        let mut rest = args.to_vec();
        while let Some(next) = rest.first() {
            let Some(child) = self.find_next(current, next) else {
                break;
            };
            rest = args_minus_first(&rest, self[child].name());
            current = child;
        }
        debug!(
            "Resolved {:?} to '{}' with args {:?}",
            args,
            self.command_path(current),
            rest
        );
        (current, rest)
    }
}
