use crate::config::Config;
use crate::error::Error;
use crate::progress::Spinner;
use crate::runner::{Runnable, Runner};
use crate::types::TypeSummary;
use crate::writer::Writer;
use serde_json::json;

const NO_TYPES: &str = "There are currently no registered custom types";

#[derive(clap::Args, Clone)]
pub(crate) struct ListCommand;

impl Runnable for ListCommand {
    fn runner<'a>(&self, writer: &'a Writer, config: &'a Config) -> impl Runner + 'a {
        ListRunner { writer, config }
    }
}

struct ListRunner<'a> {
    writer: &'a Writer,
    config: &'a Config,
}

impl Runner for ListRunner<'_> {
    fn config(&self) -> &Config {
        self.config
    }

    /// Prints out names of all registered types
    async fn run(&mut self) -> Result<(), Error> {
        let spinner = Spinner::start("Fetching registered types...", self.writer);
        let types = self.custom_types().await.list_types().await;
        spinner.finish();

        let types = types.map_err(|e| self.aws_error(Some(e.into())))?;

        if self.writer.is_structured() {
            return self.writer.json(json!({ "types": types }));
        }

        match render(&types) {
            Some(names) => self.writer.text(&names),

            // Notices go to stderr, stdout holds type names only
            None => self.writer.error(&format!(
                "{}\n",
                console::style(NO_TYPES).yellow()
            )),
        }
    }
}

/// One name per line, nothing when the registry is empty
fn render(types: &[TypeSummary]) -> Option<String> {
    if types.is_empty() {
        return None;
    }

    Some(
        types
            .iter()
            .map(|summary| format!("{}\n", summary.type_name))
            .collect(),
    )
}
