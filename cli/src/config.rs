use eyre::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILE_NAME: &str = "cdk.toml";

/// Settings from cdk.toml, overridden by command line flags
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct Config {
    /// [aws]
    /// profile = "dev"
    /// region = "eu-west-1"
    #[serde(default)]
    pub(crate) aws: AwsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct AwsSection {
    /// Named profile from the shared AWS config, the default chain is used when empty
    pub(crate) profile: Option<String>,

    /// Falls back to the region of the profile or environment
    pub(crate) region: Option<String>,
}

impl Config {
    pub(crate) fn from_path(path: &Path) -> eyre::Result<Self> {
        let config_toml_path = path.join(CONFIG_FILE_NAME);

        if let Ok(toml_string) = std::fs::read_to_string(&config_toml_path) {
            let config = toml::from_str(&toml_string)
                .wrap_err(format!("Failed to parse {config_toml_path:?}"))?;

            log::debug!("Loaded config from {config_toml_path:?}");
            Ok(config)
        } else {
            // Just use a default config if the file is not found
            Ok(Config::default())
        }
    }

    pub(crate) fn from_current_dir() -> eyre::Result<Self> {
        let path: PathBuf = std::env::current_dir().wrap_err("Failed to get current dir")?;
        Self::from_path(&path)
    }

    /// Command line flags win over the file
    pub(crate) fn with_overrides(mut self, profile: Option<String>, region: Option<String>) -> Self {
        if profile.is_some() {
            self.aws.profile = profile;
        }

        if region.is_some() {
            self.aws.region = region;
        }

        self
    }
}
