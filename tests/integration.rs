use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use cmdtree::config_file::ConfigError;
use cmdtree::shell::ShellError;
use cmdtree::{Command, CommandTree, ExecuteError, load_config};

#[derive(Clone, Default)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

fn write_config(dir: &std::path::Path, content: &str) -> String {
    let path = dir.join(".cmdtree.yaml");
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_load_config_minimal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
cmdtree_version: "0.1.0"
use: app
short: Example app
commands:
  - use: hello [name]
    short: Say hello
    run: echo hello
"#,
    );
    let (tree, root, config_path) = load_config(Some(&path)).unwrap();
    assert_eq!(tree[root].name(), "app");
    assert_eq!(tree.children(root).len(), 1);
    let hello = tree.children(root)[0];
    assert_eq!(tree[hello].name(), "hello");
    assert!(tree[hello].runnable());
    assert_eq!(config_path, dir.path().join(".cmdtree.yaml"));
}

#[test]
fn test_load_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.yaml").to_string_lossy().to_string();
    assert!(matches!(
        load_config(Some(&path)),
        Err(ConfigError::ConfigNotFound(_))
    ));
}

#[test]
fn test_load_config_duplicate_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r"
use: app
commands:
  - use: build
    run: 'true'
  - use: build --release
    run: 'true'
",
    );
    match load_config(Some(&path)) {
        Err(ConfigError::DuplicateName { parent, name }) => {
            assert_eq!(parent, "app");
            assert_eq!(name, "build");
        }
        Err(other) => panic!("Expected DuplicateName, got: {other:?}"),
        Ok(_) => panic!("Expected DuplicateName, got a tree"),
    }
}

#[test]
fn test_execute_shell_command_with_inherited_cwd_and_env() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    let path = write_config(
        dir.path(),
        r#"
use: app
env:
  GREETING: hello
commands:
  - use: write
    cwd: out
    commands:
      - use: greeting <file>
        run: 'echo "$GREETING" > "$1"'
"#,
    );
    let (mut tree, root, _) = load_config(Some(&path)).unwrap();
    tree.set_output(io::sink());
    tree.execute_with(root, ["write", "greeting", "result.txt"])
        .unwrap();
    let written = std::fs::read_to_string(dir.path().join("out").join("result.txt")).unwrap();
    assert_eq!(written.trim(), "hello");
}

#[test]
fn test_execute_shell_failure_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r"
use: app
commands:
  - use: fail
    run: exit 4
",
    );
    let (mut tree, root, _) = load_config(Some(&path)).unwrap();
    let Err(ExecuteError::Action(e)) = tree.execute_with(root, ["fail"]) else {
        panic!("Expected the shell failure to propagate");
    };
    let shell = e.downcast_ref::<ShellError>().expect("a shell error");
    assert_eq!(shell.exit_code(), Some(4));
}

#[test]
fn test_execute_group_without_run_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r"
use: app
commands:
  - use: db
    short: Database tasks
    long: Manage the database.
    commands:
      - use: migrate
        short: Apply migrations
        run: 'true'
",
    );
    let (mut tree, root, _) = load_config(Some(&path)).unwrap();
    let capture = Capture::default();
    tree.set_output(capture.clone());
    tree.execute_with(root, ["db"]).unwrap();
    insta::assert_snapshot!(capture.text(), @r#"
    Manage the database.
    Usage:
      db

    Available Commands:
      migrate    Apply migrations

    Use "db help [command] " for more information about a command.
    "#);
}

#[test]
fn test_help_command_for_nested_topic() {
    let capture = Capture::default();
    let mut tree = CommandTree::new();
    tree.set_output(capture.clone());
    let root = tree.insert(Command::new("app"));
    let db = tree.insert(Command::new("db").short("Database tasks"));
    let migrate = tree.insert(
        Command::new("migrate [--dry-run]")
            .long("Apply pending migrations.")
            .run(|_, _, _| {}),
    );
    tree.add_command(root, &[db]);
    tree.add_command(db, &[migrate]);

    tree.execute_with(root, ["help", "db", "migrate"]).unwrap();
    assert_eq!(
        capture.text(),
        "Apply pending migrations.\nUsage:\n  migrate [--dry-run]\n\n"
    );
}

#[test]
fn test_help_command_unknown_topic_is_not_an_error() {
    let capture = Capture::default();
    let mut tree = CommandTree::new();
    tree.set_output(capture.clone());
    let root = tree.insert(Command::new("app"));
    let db = tree.insert(Command::new("db").run(|_, _, _| {}));
    tree.add_command(root, &[db]);

    assert!(tree.execute_with(root, ["help", "cache", "clear"]).is_ok());
    assert_eq!(capture.text(), "Unknown help topic [`cache` `clear`]\n");
}

#[test]
fn test_repeated_execute_keeps_single_help_command() {
    let mut tree = CommandTree::new();
    tree.set_output(io::sink());
    let root = tree.insert(Command::new("app"));
    let db = tree.insert(Command::new("db").run(|_, _, _| {}));
    tree.add_command(root, &[db]);

    tree.execute_with(root, ["db"]).unwrap();
    let cache = tree.insert(Command::new("cache").run(|_, _, _| {}));
    tree.add_command(root, &[cache]);
    tree.execute_with(root, ["cache"]).unwrap();

    let help = tree[root].help_command().unwrap();
    assert_eq!(tree.children(root), &[db, cache, help]);
}
