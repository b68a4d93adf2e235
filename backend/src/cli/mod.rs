//! Command-line interface.

use clap::{Parser, Subcommand};

/// Vehicle catalogue API server
#[derive(Parser, Debug)]
#[command(name = "adimen", version)]
#[command(about = "Vehicle catalogue API with an SQS consumer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Apply database migrations, then exit
    Migrate,

    /// Migrate, provision the bootstrap user, start the consumer and serve HTTP
    #[default]
    Serve,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["adimen"]);
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_migrate_subcommand() {
        let cli = Cli::parse_from(["adimen", "migrate"]);
        assert_eq!(cli.command(), Command::Migrate);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["adimen", "launch"]).is_err());
    }
}
