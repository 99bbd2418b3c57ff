use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recurring to-do scheduler served over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve(ServeCommand),
    /// Print the next date of a repeat rule and exit
    NextDate(NextDateCommand),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve(ServeCommand::default())
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ServeCommand {
    /// Address to bind
    #[clap(long)]
    pub host: Option<String>,
    /// Port to listen on
    #[clap(short, long)]
    pub port: Option<u16>,
    /// SQLite database file
    #[clap(long)]
    pub dbfile: Option<PathBuf>,
    /// Directory with the web front end
    #[clap(long)]
    pub web_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct NextDateCommand {
    /// Reference date as YYYYMMDD; defaults to today
    #[clap(long)]
    pub now: Option<String>,
    /// Anchor date of the task as YYYYMMDD
    #[clap(short, long)]
    pub date: String,
    /// Repeat rule, e.g. "d 7", "y", "w 1,5", "m -1 2,8"
    #[clap(short, long)]
    pub repeat: String,
}
