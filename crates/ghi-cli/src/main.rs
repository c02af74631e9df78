mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::Workspace;
use ghi_core::{diff::DiffOutcome, gh::GhCli, ErrorKind, GhiError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ghi",
    about = "Pull and push GitHub issues as markdown files with YAML frontmatter, using the authenticated gh CLI",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding .ghi.yaml and issues/ (default: nearest .ghi.yaml, else cwd)
    #[arg(long, global = true, env = "GHI_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log external commands and file writes to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an issue and write it to issues/<n>.md
    Pull { number: String },

    /// Update an issue from issues/<n>.md
    Push { number: String },

    /// Compare issues/<n>.md with the remote issue (exit 1 when they differ)
    Diff {
        number: String,

        /// Extra arguments passed to git diff, after `--`
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Create an issue and write it to issues/<n>.md
    Create { title: String },

    /// Close an issue
    Close { number: String },

    /// Reopen a closed issue
    Reopen { number: String },

    /// Show the repository gh resolves for this directory
    Repo,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap exits with 2 on bad arguments; 2 is reserved for environment errors here.
            let code = if e.use_stderr() {
                ErrorKind::Usage.exit_code()
            } else {
                0
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let code = match run(cli.command, root, cli.json) {
        Ok(code) => code,
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            exit_code(&e)
        }
    };
    std::process::exit(code);
}

fn run(command: Commands, root: PathBuf, json: bool) -> anyhow::Result<i32> {
    let ws = Workspace::load(root)?;
    let gh = GhCli::from_config(&ws.root, &ws.config);

    match command {
        Commands::Pull { number } => cmd::pull::run(&ws, &gh, &number, json)?,
        Commands::Push { number } => cmd::push::run(&ws, &gh, &number, json)?,
        Commands::Diff { number, extra } => {
            return Ok(match cmd::diff::run(&ws, &gh, &number, &extra)? {
                DiffOutcome::Identical => 0,
                DiffOutcome::Different => 1,
            });
        }
        Commands::Create { title } => cmd::create::run(&ws, &gh, &title, json)?,
        Commands::Close { number } => cmd::state::close(&ws, &gh, &number, json)?,
        Commands::Reopen { number } => cmd::state::reopen(&ws, &gh, &number, json)?,
        Commands::Repo => cmd::repo::run(&gh, json)?,
    }
    Ok(0)
}

/// Exit status for a failed command: the kind of the first `GhiError` in the
/// chain, or IO when none is present.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<GhiError>())
        .map(GhiError::kind)
        .unwrap_or(ErrorKind::Io)
        .exit_code()
}
