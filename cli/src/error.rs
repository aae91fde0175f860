/// Global error message shown to the user, with optional details as a hint
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.1 {
            Some(details) => write!(f, "{}\n\n{}", self.0, console::style(details).dim()),
            None => write!(f, "{}", self.0),
        }
    }
}

impl std::error::Error for Error {}

/// Keep the message of an Error wrapped into an eyre report, wrap any other report
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        error
            .downcast::<Error>()
            .unwrap_or_else(|err| Error::new(&format!("{err:#}"), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_own_errors_from_reports() {
        let report = eyre::Report::new(Error::new("Invalid type name", Some("Use Org::Service::Resource")));
        let error = Error::from(report);

        assert_eq!(error.0, "Invalid type name");
        assert_eq!(error.1.as_deref(), Some("Use Org::Service::Resource"));
    }

    #[test]
    fn keeps_context_of_foreign_errors() {
        let report = eyre::eyre!("connection reset").wrap_err("Failed to list types");
        let error = Error::from(report);

        assert_eq!(error.to_string(), "Failed to list types: connection reset");
    }
}
