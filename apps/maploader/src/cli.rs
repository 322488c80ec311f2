//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "maploader", author, version, about = "Install custom maps and launch the game with them", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the platform config path).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Game data folder, overriding the configured one.
    #[arg(long, global = true, value_name = "DIR")]
    pub app_data: Option<PathBuf>,

    /// Map Loader data folder, overriding the configured one.
    #[arg(long, global = true, value_name = "DIR")]
    pub user_data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a map package (.zip).
    Import {
        #[arg(value_name = "PACKAGE")]
        package: PathBuf,
        /// Codes treated as already loaded. Defaults to the installed maps.
        #[arg(long = "existing", value_name = "CODE")]
        existing: Vec<String>,
    },
    /// Delete an installed map.
    Delete {
        #[arg(value_name = "CODE")]
        code: String,
    },
    /// Start the game with installed maps and wait for it to exit.
    Start {
        /// Game executable, overriding the configured one.
        #[arg(long, value_name = "PATH")]
        game: Option<PathBuf>,
        /// Maps to load. Defaults to every installed map.
        #[arg(value_name = "CODE")]
        codes: Vec<String>,
    },
    /// List installed maps.
    List,
    /// Choose the game data folder and remember it.
    SelectFolder,
    /// Choose an existing file and print its path.
    SelectFile,
    /// Write a message to a log file.
    WriteLog {
        /// File name inside the logs folder.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_with_existing_codes() {
        let cli = Cli::try_parse_from([
            "maploader",
            "import",
            "lisbon.zip",
            "--existing",
            "LIS",
            "--existing",
            "OPO",
        ])
        .unwrap();
        match cli.command {
            Command::Import { package, existing } => {
                assert_eq!(package, PathBuf::from("lisbon.zip"));
                assert_eq!(existing, vec!["LIS", "OPO"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "maploader",
            "start",
            "LIS",
            "OPO",
            "--app-data",
            "/games/data",
        ])
        .unwrap();
        assert_eq!(cli.app_data, Some(PathBuf::from("/games/data")));
        match cli.command {
            Command::Start { game, codes } => {
                assert!(game.is_none());
                assert_eq!(codes, vec!["LIS", "OPO"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn write_log_requires_message() {
        assert!(Cli::try_parse_from(["maploader", "write-log"]).is_err());
        let cli =
            Cli::try_parse_from(["maploader", "write-log", "--message", "hello"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::WriteLog { name: None, ref message } if message == "hello"
        ));
    }
}
