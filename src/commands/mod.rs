//! Command tree and dispatch
//!
//! Commands live in a [`tree::CommandTree`] arena and are linked into a hierarchy with
//! `add_command`. Executing a command resolves the leading argument tokens against
//! child names (`find`), runs the deepest match with the remaining tokens, and falls
//! back to rendering help for commands without an action.
//!
//! Help functions are inherited: a command without its own help function uses the
//! nearest ancestor's, and the root falls back to a built-in renderer.

pub mod command;
pub mod execute;
pub mod find;
pub mod help;
pub mod inherit;
pub mod tree;
