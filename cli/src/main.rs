mod commands;
mod config;
mod error;
mod logger;
mod progress;
mod runner;
mod sdk;
mod types;
mod writer;
use crate::commands::types::TypesCommands;
use crate::commands::Commands;
use crate::config::Config;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Output structured JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Named AWS profile, overrides the one in cdk.toml
    #[arg(long, global = true)]
    profile: Option<String>,

    /// AWS region, overrides the one in cdk.toml
    #[arg(long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Derive a runner from the command and run it
///
/// Prints the error and exits with a non-zero code on failure.
async fn run(command: impl Runnable, writer: &Writer, config: &Config) {
    if let Err(error) = command.runner(writer, config).run().await {
        // Nothing else to report to if stderr is gone
        let _ = writer.error(&format!(
            "\n{}\n{error}\n",
            console::style("Error").red().bold()
        ));

        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() {
    Logger::init();

    let cli = Cli::parse();
    let writer = Writer::new(cli.json);

    let config = match Config::from_current_dir() {
        Ok(config) => config.with_overrides(cli.profile, cli.region),
        Err(error) => {
            let _ = writer.error(&format!(
                "{}\n{}\n",
                console::style("Invalid configuration").red().bold(),
                error::Error::from(error)
            ));

            std::process::exit(1);
        }
    };

    // Match all commands here, in one place
    match cli.command {
        Commands::Types(types) => match types {
            TypesCommands::List(cmd) => run(cmd, &writer, &config).await,
            TypesCommands::ListKnown(cmd) => run(cmd, &writer, &config).await,
            TypesCommands::Init(cmd) => run(cmd, &writer, &config).await,
            TypesCommands::RegisterKnown(cmd) => run(cmd, &writer, &config).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cdk", "types", "list", "--json", "--region", "eu-west-1",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert!(matches!(cli.command, Commands::Types(TypesCommands::List(_))));
    }

    #[test]
    fn type_is_an_alias_of_types() {
        let cli = Cli::try_parse_from(["cdk", "type", "register-known", "Datadog::IAM::User"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Types(TypesCommands::RegisterKnown(_))
        ));
    }

    #[test]
    fn register_known_requires_type_name() {
        assert!(Cli::try_parse_from(["cdk", "types", "register-known"]).is_err());
    }
}
