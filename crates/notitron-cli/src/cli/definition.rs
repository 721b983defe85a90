//! CLI definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::add::AddArgs;
use super::list::ListArgs;
use super::scan::ScanArgs;

#[derive(Parser)]
#[command(name = "notitron", version, about = "Assignment reminder bot for Discord")]
pub struct Cli {
    /// Path to config.toml (defaults to the user config dir)
    #[arg(short, long, global = true, env = "NOTITRON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to Discord and run the reminder and cleanup loops (default)
    Run,

    /// Add a task directly to the store
    Add(AddArgs),

    /// List stored tasks
    List(ListArgs),

    /// Run one reminder scan now
    Scan(ScanArgs),

    /// Delete expired tasks now
    Clean,

    /// Print the effective configuration
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["notitron"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn add_takes_three_positionals() {
        let cli = Cli::try_parse_from([
            "notitron", "add", "--user", "42", "CS 101", "HW3", "12/25/24",
        ])
        .unwrap();
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.class_name, "CS 101");
        assert_eq!(args.assignment_name, "HW3");
        assert_eq!(args.due_date, "12/25/24");
        assert_eq!(args.user, "42");
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["notitron", "scan", "--dry-run", "-v", "-c", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
