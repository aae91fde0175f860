use crate::config::Config;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use eyre::WrapErr;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Org::Service::Resource, the format the registry accepts
static TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]{2,64}::[A-Za-z0-9]{2,64}::[A-Za-z0-9]{2,64}$")
        .expect("type name regex is valid")
});

#[derive(clap::Args, Clone)]
pub(crate) struct InitCommand {
    /// Name of the new type, e.g. Acme::Storage::Bucket
    #[arg(value_name = "TYPE_NAME")]
    type_name: String,

    /// Directory to create the type in
    #[arg(short, long, default_value = ".")]
    path: PathBuf,
}

impl Runnable for InitCommand {
    fn runner<'a>(&self, writer: &'a Writer, config: &'a Config) -> impl Runner + 'a {
        InitRunner {
            command: self.clone(),
            writer,
            config,
        }
    }
}

struct InitRunner<'a> {
    command: InitCommand,
    writer: &'a Writer,
    config: &'a Config,
}

impl Runner for InitRunner<'_> {
    fn config(&self) -> &Config {
        self.config
    }

    /// Creates a directory with the resource schema of the new type
    async fn run(&mut self) -> Result<(), Error> {
        let type_name = &self.command.type_name;

        if !TYPE_NAME.is_match(type_name) {
            return Err(self.error(
                Some("Invalid type name"),
                Some("Use the Org::Service::Resource format, e.g. Acme::Storage::Bucket."),
                None,
            ));
        }

        let target = self.command.path.join(directory_name(type_name));

        if target.exists() {
            return Err(self.error(
                Some("Directory already exists"),
                Some(&format!("Remove {} or pick another --path.", target.display())),
                None,
            ));
        }

        let schema_path =
            bootstrap(&target, type_name).map_err(|e| self.error(None, None, Some(e.into())))?;

        if self.writer.is_structured() {
            return self.writer.json(json!({
                "type_name": type_name,
                "schema": schema_path.display().to_string(),
            }));
        }

        self.writer.text(&format!(
            "{} {}\n{}\n",
            console::style("Created").green().bold(),
            console::style(type_name).bold(),
            console::style(schema_path.display()).dim(),
        ))
    }
}

/// Acme::Storage::Bucket becomes acme-storage-bucket
fn directory_name(type_name: &str) -> String {
    type_name.to_lowercase().replace("::", "-")
}

fn schema(type_name: &str) -> serde_json::Value {
    json!({
        "typeName": type_name,
        "description": format!("An example resource schema for {type_name}"),
        "properties": {
            "Id": {
                "description": "Identifier assigned by the provider",
                "type": "string"
            },
            "Title": {
                "description": "A title for the resource",
                "type": "string",
                "minLength": 1,
                "maxLength": 250
            }
        },
        "additionalProperties": false,
        "required": ["Title"],
        "readOnlyProperties": ["/properties/Id"],
        "primaryIdentifier": ["/properties/Id"],
        "handlers": {
            "create": {"permissions": []},
            "read": {"permissions": []},
            "update": {"permissions": []},
            "delete": {"permissions": []},
            "list": {"permissions": []}
        }
    })
}

/// Write the schema file, returns its path
fn bootstrap(target: &Path, type_name: &str) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(target).wrap_err(format!("Failed to create {target:?}"))?;

    let schema_path = target.join(format!("{}.json", directory_name(type_name)));
    let content = serde_json::to_string_pretty(&schema(type_name))?;

    std::fs::write(&schema_path, content).wrap_err(format!("Failed to write {schema_path:?}"))?;
    log::debug!("Schema written to {schema_path:?}");
    Ok(schema_path)
}
