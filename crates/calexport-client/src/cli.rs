//! Command-line interface definition.

use std::path::PathBuf;

use calexport_core::TracingOutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// calexport - Export Microsoft 365 calendars to JSON and per-owner CSV
#[derive(Debug, Parser)]
#[command(name = "calexport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "CALEXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output (also keeps cancelled events when fetching)
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Log line formats selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single lines
    Compact,
    /// JSON lines
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export a mailbox calendar from Microsoft Graph to a JSON document
    Fetch(FetchArgs),

    /// Write one CSV of meeting URLs per owner from an export document
    Project(ProjectArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `calexport fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Mailbox whose calendar is exported
    #[arg(long)]
    pub user: String,

    /// Output JSON file
    #[arg(long, default_value = "ms_events_export.json")]
    pub output: PathBuf,

    /// Pretty print JSON with indentation
    #[arg(long)]
    pub pretty: bool,

    /// Loose credentials file (Tenant ID / Client ID / Value lines)
    #[arg(long, default_value = "keys.txt")]
    pub keys_file: PathBuf,
}

/// Arguments for `calexport project`.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Export document produced by `calexport fetch`
    #[arg(long)]
    pub input: PathBuf,

    /// Directory for the CSV files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Only write the CSV of this owner
    #[arg(long)]
    pub user: Option<String>,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the configuration file path
    Path,

    /// Check that Graph credentials resolve
    Validate {
        /// Loose credentials file to include
        #[arg(long, default_value = "keys.txt")]
        keys_file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["calexport", "fetch", "--user", "a@x.com"]).unwrap();
        assert!(!cli.debug);
        assert_eq!(cli.log_format, LogFormat::Compact);
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.user, "a@x.com");
                assert_eq!(args.output, PathBuf::from("ms_events_export.json"));
                assert_eq!(args.keys_file, PathBuf::from("keys.txt"));
                assert!(!args.pretty);
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn fetch_requires_user() {
        assert!(Cli::try_parse_from(["calexport", "fetch"]).is_err());
    }

    #[test]
    fn debug_after_subcommand() {
        let cli = Cli::try_parse_from([
            "calexport", "fetch", "--user", "a@x.com", "--debug", "--pretty",
        ])
        .unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Command::Fetch(ref a) if a.pretty));
    }

    #[test]
    fn json_log_format() {
        let cli = Cli::try_parse_from([
            "calexport",
            "project",
            "--input",
            "export.json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(
            TracingOutputFormat::from(cli.log_format),
            TracingOutputFormat::Json
        );
        let bad = Cli::try_parse_from(["calexport", "--log-format", "xml", "config", "path"]);
        assert!(bad.is_err());
    }

    #[test]
    fn project_args() {
        let cli = Cli::try_parse_from([
            "calexport",
            "project",
            "--input",
            "export.json",
            "--user",
            "a@x.com",
        ])
        .unwrap();
        match cli.command {
            Command::Project(args) => {
                assert_eq!(args.input, PathBuf::from("export.json"));
                assert_eq!(args.output_dir, PathBuf::from("."));
                assert_eq!(args.user.as_deref(), Some("a@x.com"));
            }
            other => panic!("expected project, got {:?}", other),
        }
    }
}
