use crate::config::Config;
use crate::error::Error;
use crate::progress::Spinner;
use crate::runner::{Runnable, Runner};
use crate::types::{CustomTypes, Registry, UnknownTypeError};
use crate::writer::Writer;
use serde_json::json;

#[derive(clap::Args, Clone)]
pub(crate) struct RegisterKnownCommand {
    /// One of the types printed by `cdk types list-known`, case sensitive
    #[arg(value_name = "TYPE_NAME")]
    type_name: String,
}

impl Runnable for RegisterKnownCommand {
    fn runner<'a>(&self, writer: &'a Writer, config: &'a Config) -> impl Runner + 'a {
        RegisterKnownRunner {
            command: self.clone(),
            writer,
            config,
        }
    }
}

struct RegisterKnownRunner<'a> {
    command: RegisterKnownCommand,
    writer: &'a Writer,
    config: &'a Config,
}

impl RegisterKnownRunner<'_> {
    async fn register<R: Registry>(
        &self,
        custom_types: &CustomTypes<R>,
    ) -> Result<Option<String>, Error> {
        custom_types
            .register_known_type(&self.command.type_name)
            .await
            .map_err(|e| match e.downcast_ref::<UnknownTypeError>() {
                Some(unknown) => self.error(
                    Some(&unknown.to_string()),
                    Some("Run `cdk types list-known` to see the types which can be registered."),
                    None,
                ),
                None => self.aws_error(Some(e.into())),
            })
    }
}

impl Runner for RegisterKnownRunner<'_> {
    fn config(&self) -> &Config {
        self.config
    }

    /// Starts the registration and prints out its token
    async fn run(&mut self) -> Result<(), Error> {
        let custom_types = self.custom_types().await;

        let spinner = Spinner::start(
            &format!("Registering {}...", self.command.type_name),
            self.writer,
        );

        let token = self.register(&custom_types).await;
        spinner.finish();
        let token = token?;

        if self.writer.is_structured() {
            return self.writer.json(json!({
                "type_name": self.command.type_name,
                "registration_token": token,
            }));
        }

        self.writer
            .text(&format!("{}\n", token.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::FakeRegistry;

    fn runner<'a>(type_name: &str, writer: &'a Writer, config: &'a Config) -> RegisterKnownRunner<'a> {
        RegisterKnownRunner {
            command: RegisterKnownCommand {
                type_name: type_name.into(),
            },
            writer,
            config,
        }
    }

    #[tokio::test]
    async fn returns_registration_token() {
        let writer = Writer::new(true);
        let config = Config::default();
        let custom_types = CustomTypes::new(FakeRegistry::default());

        let token = runner("Datadog::Monitors::Monitor", &writer, &config)
            .register(&custom_types)
            .await
            .unwrap();

        assert_eq!(token.as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn unknown_type_points_to_list_known() {
        let writer = Writer::new(true);
        let config = Config::default();
        let custom_types = CustomTypes::new(FakeRegistry::default());

        let error = runner("Acme::Widgets::Widget", &writer, &config)
            .register(&custom_types)
            .await
            .unwrap_err()
            .to_string();

        assert!(error.starts_with("'Acme::Widgets::Widget' is not a known resource type"));
        assert!(error.contains("cdk types list-known"));
    }
}
