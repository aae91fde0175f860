use crate::config::Config;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::types::known_types;
use crate::writer::Writer;
use serde_json::json;
use tabled::settings::{peaker::Priority, style::Style, Settings, Width};
use tabled::{Table, Tabled};
use terminal_size::{terminal_size, Width as TerminalWidth};

/// Used when the output is not a terminal
const DEFAULT_WIDTH: usize = 120;

#[derive(Tabled)]
struct KnownTypeRow {
    #[tabled(rename = "Type")]
    type_name: &'static str,
    #[tabled(rename = "Schema Handler Package")]
    package: &'static str,
}

#[derive(clap::Args, Clone)]
pub(crate) struct ListKnownCommand;

impl Runnable for ListKnownCommand {
    fn runner<'a>(&self, writer: &'a Writer, config: &'a Config) -> impl Runner + 'a {
        ListKnownRunner { writer, config }
    }
}

struct ListKnownRunner<'a> {
    writer: &'a Writer,
    config: &'a Config,
}

impl Runner for ListKnownRunner<'_> {
    fn config(&self) -> &Config {
        self.config
    }

    /// Prints out the table of types which can be registered with `register-known`
    async fn run(&mut self) -> Result<(), Error> {
        if self.writer.is_structured() {
            let types: Vec<_> = known_types()
                .map(|(type_name, package)| json!({"type_name": type_name, "package": package}))
                .collect();

            return self.writer.json(json!({ "types": types }));
        }

        let width = terminal_size()
            .map(|(TerminalWidth(width), _)| width as usize)
            .unwrap_or(DEFAULT_WIDTH);

        self.writer.text(&format!("{}\n", table(width)))
    }
}

fn table(width: usize) -> Table {
    let rows = known_types().map(|(type_name, package)| KnownTypeRow { type_name, package });

    let mut table = Table::new(rows);

    table.with(Style::modern()).with(
        Settings::default()
            .with(Width::wrap(width).priority(Priority::max(true)))
            .with(Width::increase(width)),
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_known_type() {
        let rendered = table(DEFAULT_WIDTH).to_string();

        assert!(rendered.contains("Schema Handler Package"));

        for (type_name, _) in known_types() {
            assert!(rendered.contains(type_name), "{type_name} is missing");
        }
    }
}
