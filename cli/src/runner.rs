use crate::config::Config;
use crate::error::Error;
use crate::sdk::Sdk;
use crate::types::CustomTypes;
use crate::writer::Writer;
use std::error::Error as StdError;

pub(crate) trait Runner {
    fn config(&self) -> &Config;

    /// Custom types backed by the CloudFormation registry
    ///
    /// Credentials are resolved lazily, so this never fails by itself.
    async fn custom_types(&self) -> CustomTypes<Sdk> {
        CustomTypes::new(Sdk::new(&self.config().aws).await)
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    async fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new(
                "Failed to run the command",
                Some("Run again with RUST_LOG=debug to see the details."),
            )
        }
    }

    /// A shortcut to display a failed AWS call
    fn aws_error(&self, origin: Option<Box<dyn StdError>>) -> Error {
        self.error(
            Some("AWS request failed"),
            Some("Check your credentials, profile and region."),
            origin,
        )
    }
}

/// Return a runner for a command
pub(crate) trait Runnable {
    fn runner<'a>(&self, writer: &'a Writer, config: &'a Config) -> impl Runner + 'a;
}
