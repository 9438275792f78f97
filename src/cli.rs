use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "zedws", version, about = "Search and open recent Zed workspaces")]
pub struct Cli {
    /// Workspace database path (skips channel discovery)
    #[arg(long, env = "ZEDWS_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Debug logging on stderr (overridden by ZEDWS_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List recent workspaces, optionally filtered by a substring
    List(ListArgs),
    /// Open a workspace path in the editor
    Open(OpenArgs),
    /// Answer launcher JSON-RPC requests (one argument, or lines on stdin)
    Rpc(RpcArgs),
    /// Print the resolved workspace database path
    Locate,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Case-insensitive substring matched against the full path
    #[arg(default_value = "")]
    pub query: String,

    /// Emit workspace records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct OpenArgs {
    /// Path as stored by the editor (Windows or WSL style)
    pub path: String,
}

#[derive(Parser)]
pub struct RpcArgs {
    /// A single request, e.g. '{"method":"query","parameters":["app"]}'
    pub request: Option<String>,
}
