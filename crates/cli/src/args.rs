//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "auto-table")]
#[command(about = "Generate dependency-ordered SQL migrations from annotated record descriptions")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Directory (or single file) holding the record descriptions
    #[arg(short, long, global = true, env = "AUTOTABLE_SOURCE")]
    pub source: Option<PathBuf>,

    /// Configuration file [default: ./autotable.toml when present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Struct-tag key holding the column options
    #[arg(long, global = true)]
    pub tag_key: Option<String>,

    /// Do not treat `id` fields as primary keys
    #[arg(long, global = true)]
    pub no_auto_id: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the migration files
    Generate {
        /// Output directory [default: ./migrations]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing migration files
        #[arg(short, long)]
        force: bool,

        /// Timestamp of the first migration, in unix seconds [default: now]
        #[arg(long)]
        start_time: Option<i64>,
    },

    /// Print the emission order, filenames and warnings without writing
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every statement rendered for one table
    Show {
        /// Catalog key of the table (e.g. `user`, `post_tag`)
        table: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "auto-table",
            "generate",
            "--source",
            "models",
            "--output",
            "db",
            "--force",
            "--start-time",
            "1700000000",
            "--no-auto-id",
        ]);

        assert_eq!(cli.common.source, Some(PathBuf::from("models")));
        assert!(cli.common.no_auto_id);
        match cli.command {
            Command::Generate {
                output,
                force,
                start_time,
            } => {
                assert_eq!(output, Some(PathBuf::from("db")));
                assert!(force);
                assert_eq!(start_time, Some(1_700_000_000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::parse_from(["auto-table", "-v", "show", "post_tag"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Show { ref table } if table == "post_tag"));
    }
}
