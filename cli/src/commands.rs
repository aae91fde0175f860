pub(crate) mod types;
use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage custom resource types in the CloudFormation registry
    #[clap(subcommand, alias = "type")]
    Types(types::TypesCommands),
}
