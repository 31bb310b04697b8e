pub mod app;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "impactdesk")]
#[command(about = "Browse and edit impact dashboard resources from the command line")]
pub struct Cli {
    /// API base URL (defaults to IMPACTDESK_API_URL or http://localhost:3000/api)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Use the in-process backend instead of the HTTP API
    #[arg(long, global = true)]
    pub offline: bool,

    /// Where the signed-in session is kept
    #[arg(long, global = true, default_value = ".impactdesk/session.json")]
    pub session_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Projects visible to the signed-in user
    MyProjects,
    /// Load every collection and print a summary line per kind
    Status,
    Projects {
        #[command(subcommand)]
        action: EntityAction,
    },
    Activities {
        #[command(subcommand)]
        action: EntityAction,
    },
    Metrics {
        #[command(subcommand)]
        action: EntityAction,
    },
    Reports {
        #[command(subcommand)]
        action: EntityAction,
    },
    Users {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Resolve a report's document and count its pages
    Preview {
        report_id: String,
    },
    /// Walk through a project/activity round trip against the backend
    Demo,
}

#[derive(Subcommand)]
pub enum EntityAction {
    List(ListArgs),
    Get {
        id: String,
    },
    Create {
        /// Creation payload as a JSON object
        #[arg(long)]
        json: String,
    },
    Update {
        id: String,
        /// Field assignment as field=value; values are parsed as JSON when possible
        #[arg(long = "set", required = true)]
        fields: Vec<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list children of this parent (project, activity or owner id)
    #[arg(long)]
    pub parent: Option<String>,
}
