use crate::logger::Logger;
use crate::writer::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{stderr, IsTerminal};
use std::time::Duration;

/// Spinner shown while waiting for the registry to respond
pub(crate) struct Spinner(ProgressBar);

impl Spinner {
    /// Hidden in structured mode and when stderr is not a terminal
    pub(crate) fn start(message: &str, writer: &Writer) -> Self {
        if writer.is_structured() || !stderr().is_terminal() {
            return Spinner(ProgressBar::hidden());
        }

        let spinner = Logger::multi_progress().add(ProgressBar::new_spinner());

        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("   {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Spinner(spinner)
    }

    pub(crate) fn finish(self) {
        self.0.finish_and_clear();
    }
}
