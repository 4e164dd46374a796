//! CLI entry point for taskmgr.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use taskmgr_app::ClientConfig;
use taskmgr_core::UserId;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

use commands::Session;

/// Projects, task lists and tasks on a json-server style backend.
#[derive(Parser, Debug)]
#[command(
    name = "taskmgr",
    version,
    about = "taskmgr: drive a task board backend through its action store"
)]
struct Cli {
    /// Explicit config file (defaults to .taskmgr/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend root, overriding config and environment.
    #[arg(long)]
    base_uri: Option<String>,

    /// Act as this user, overriding config and environment.
    #[arg(long)]
    user: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the projects of the signed-in user.
    Projects,

    /// Create a project with its default task lists.
    NewProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        desc: Option<String>,
        /// Index of a stock cover.
        #[arg(long)]
        cover: Option<usize>,
    },

    /// Change name, description or cover of a project.
    EditProject {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        cover: Option<usize>,
    },

    /// Delete a project and its task lists.
    DeleteProject {
        #[arg(long)]
        id: String,
    },

    /// Open a project, loading its lists, tasks and members.
    SelectProject {
        #[arg(long)]
        id: String,
    },

    /// Add members to a project.
    Invite {
        #[arg(long)]
        project: String,
        #[arg(short = 'u', long = "user", required = true)]
        users: Vec<String>,
    },

    /// Show the task lists and tasks of a project.
    Tasks {
        #[arg(long)]
        project: String,
    },

    /// Create a task in a list.
    AddTask {
        #[arg(long)]
        list: String,
        #[arg(long)]
        desc: String,
        /// 1 = urgent, 2 = important, 3 = normal.
        #[arg(long, default_value_t = 3)]
        priority: u8,
        #[arg(long)]
        remark: Option<String>,
    },

    /// Toggle the completion flag of a task.
    CompleteTask {
        #[arg(long)]
        list: String,
        #[arg(long)]
        id: String,
    },

    /// Move a task to another list.
    MoveTask {
        #[arg(long)]
        id: String,
        #[arg(long)]
        to: String,
    },

    /// Move every task of one list to another.
    MoveAll {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

fn main() -> Result<()> {
    let Cli {
        config,
        base_uri,
        user,
        cmd,
    } = Cli::parse();

    install_tracing();

    let config = resolve_config(config, base_uri, user)?;
    tokio::runtime::Runtime::new()?.block_on(async move {
        let session = Session::start(config).await?;
        let outcome = commands::run(&session, cmd).await;
        session.shutdown().await;
        report(&outcome?)
    })
}

fn resolve_config(path: Option<PathBuf>, base_uri: Option<String>, user: Option<String>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::load(".")?,
    }
    .with_env()?;
    if let Some(base_uri) = base_uri {
        config.base_uri = base_uri;
    }
    if let Some(user) = user {
        config.user_id = Some(UserId::new(user));
    }
    Ok(config)
}

/// Print each action as one JSON line; fail when any of them is a failure.
fn report(actions: &[taskmgr_core::Action]) -> Result<()> {
    for action in actions {
        println!("{}", serde_json::to_string(action)?);
    }
    if let Some(failed) = actions.iter().find(|a| a.failure().is_some()) {
        bail!("{}: {}", failed.tag(), failed.failure().unwrap_or_default());
    }
    Ok(())
}

fn install_tracing() {
    // RUST_LOG is honoured; INFO by default.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
