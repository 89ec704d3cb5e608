mod cmd_check;
mod cmd_config;
mod cmd_init;
mod cmd_list;
mod cmd_progress;
mod cmd_validate;
mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use workspace::Overrides;

#[derive(Parser)]
#[command(name = "stepwise", version, about = "Tutorial progress and prerequisite prompts")]
struct Cli {
    /// Workspace root (defaults to the nearest directory with .stepwise/, else cwd)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Tutorials directory (overrides config)
    #[arg(long, global = true)]
    tutorials: Option<PathBuf>,
    /// Progress file (overrides config)
    #[arg(long, global = true)]
    progress: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a .stepwise/ workspace
    Init,
    /// List tutorials by section with completion marks
    List,
    /// Show what to do before starting a tutorial
    Check {
        /// Tutorial slug
        slug: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a tutorial complete
    Complete {
        /// Tutorial slug
        slug: String,
        /// Seconds spent on the tutorial
        #[arg(long)]
        time_spent: Option<u64>,
    },
    /// Mark a tutorial incomplete
    Reset {
        /// Tutorial slug
        slug: String,
    },
    /// Show overall completion
    Status,
    /// Check tutorial frontmatter and the prerequisite graph
    Validate,
    /// Print tutorials in prerequisite order
    Order,
    /// Export, import, or clear stored progress
    Progress {
        #[command(subcommand)]
        cmd: cmd_progress::ProgressCmd,
    },
    /// Manage workspace configuration
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("STEPWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => {
            let cwd = std::env::current_dir()?;
            stepwise_store::StepwisePaths::find_root(&cwd).unwrap_or(cwd)
        }
    };
    let overrides = Overrides {
        tutorials: cli.tutorials,
        progress: cli.progress,
    };

    let ws = || workspace::Workspace::resolve(&root, &overrides);

    match cli.cmd {
        Command::Init => cmd_init::execute(&root),
        Command::List => cmd_list::execute(&ws()?),
        Command::Check { slug, json } => cmd_check::execute(&ws()?, &slug, json),
        Command::Complete { slug, time_spent } => {
            cmd_progress::complete(&ws()?, &slug, time_spent)
        }
        Command::Reset { slug } => cmd_progress::reset(&ws()?, &slug),
        Command::Status => cmd_progress::status(&ws()?),
        Command::Validate => cmd_validate::validate(&ws()?),
        Command::Order => cmd_validate::order(&ws()?),
        Command::Progress { cmd } => cmd_progress::run(cmd, &ws()?),
        Command::Config { cmd } => cmd_config::run(cmd, &root),
    }
}
