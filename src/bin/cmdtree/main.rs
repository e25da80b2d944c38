use std::process::ExitCode;

use clap::Parser;
use log::debug;

use cmdtree::shell::ShellError;
use cmdtree::{ExecuteError, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "cmdtree",
    about = "Run nested commands declared in a config file",
    after_help = "Everything after the options is resolved against the command tree, e.g. `cmdtree db migrate --dry-run`."
)]
struct Cli {
    /// Path to config file (auto-detected if not specified)
    #[arg(short, long)]
    config: Option<String>,

    /// Log file path (enables file logging in addition to stderr)
    #[arg(long)]
    log_file: Option<String>,

    /// Command path followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    cmdtree::logger::init(log_file);

    let (mut tree, root, config_path) = load_config(cli.config.as_deref())?;
    debug!("Loaded {} commands from {}", tree.len(), config_path.display());

    match tree.execute_with(root, cli.args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Pass the exit status of a failed shell command through
        Err(ExecuteError::Action(e)) => {
            if let Some(code) = e.downcast_ref::<ShellError>().and_then(ShellError::exit_code) {
                return Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)));
            }
            Err(e)
        }
        Err(e) => Err(e.into()),
    }
}
