pub(crate) mod init;
pub(crate) mod list;
pub(crate) mod list_known;
pub(crate) mod register_known;
use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum TypesCommands {
    /// List all registered resource types
    List(list::ListCommand),

    /// List all the known third-party resource types
    ListKnown(list_known::ListKnownCommand),

    /// Bootstrap a registrable resource type from a template
    Init(init::InitCommand),

    /// Register a known third-party resource type
    RegisterKnown(register_known::RegisterKnownCommand),
}
