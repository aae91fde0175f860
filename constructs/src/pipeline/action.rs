use super::Artifact;
use crate::iam::Role;
use crate::s3::Bucket;
use crate::{Error, Result, Token};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ActionCategory {
    Source,
    Build,
    Test,
    Approval,
    Deploy,
    Invoke,
}

/// How many input and output artifacts an action accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtifactBounds {
    pub min_inputs: usize,
    pub max_inputs: usize,
    pub min_outputs: usize,
    pub max_outputs: usize,
}

impl ArtifactBounds {
    /// Deploy actions take exactly one input and produce nothing
    pub fn deploy() -> Self {
        ArtifactBounds {
            min_inputs: 1,
            max_inputs: 1,
            min_outputs: 0,
            max_outputs: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionProperties {
    pub action_name: String,
    pub category: ActionCategory,
    pub owner: &'static str,
    pub provider: &'static str,
    pub version: &'static str,
    pub artifact_bounds: ArtifactBounds,
    pub inputs: Vec<Artifact>,
    pub outputs: Vec<Artifact>,
    pub run_order: Option<u32>,

    /// The resource the action works on, if it is known
    pub resource: Option<Token>,
}

impl ActionProperties {
    pub(crate) fn validate_artifacts(&self) -> Result<()> {
        let bounds = &self.artifact_bounds;

        for (kind, count, min, max) in [
            ("input", self.inputs.len(), bounds.min_inputs, bounds.max_inputs),
            ("output", self.outputs.len(), bounds.min_outputs, bounds.max_outputs),
        ] {
            if count < min || count > max {
                return Err(Error::config(format!(
                    "Action '{}' takes {min} to {max} {kind} artifacts, got {count}",
                    self.action_name
                )));
            }
        }

        Ok(())
    }
}

/// What a stage provides to an action it binds
pub struct ActionBindOptions<'a> {
    /// The role the pipeline assumes to run the action
    pub role: &'a mut Role,

    /// Bucket with the pipeline's artifacts
    pub bucket: &'a Bucket,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionConfig {
    pub configuration: Value,
}

pub trait Action {
    fn properties(&self) -> &ActionProperties;

    /// Grant the permissions the action needs and return its configuration
    fn bind(&self, options: &mut ActionBindOptions<'_>) -> Result<ActionConfig>;

    /// Bind the action and render its entry of a stage's "Actions" list
    fn declaration(&self, options: &mut ActionBindOptions<'_>) -> Result<Value> {
        let config = self.bind(options)?;
        let properties = self.properties();

        let artifacts = |artifacts: &[Artifact]| -> Vec<Value> {
            artifacts.iter().map(|a| json!({"Name": a.name})).collect()
        };

        let mut declaration = json!({
            "Name": properties.action_name,
            "ActionTypeId": {
                "Category": properties.category,
                "Owner": properties.owner,
                "Provider": properties.provider,
                "Version": properties.version,
            },
            "Configuration": config.configuration,
        });

        if !properties.inputs.is_empty() {
            declaration["InputArtifacts"] = Value::Array(artifacts(&properties.inputs));
        }

        if !properties.outputs.is_empty() {
            declaration["OutputArtifacts"] = Value::Array(artifacts(&properties.outputs));
        }

        if let Some(run_order) = properties.run_order {
            declaration["RunOrder"] = json!(run_order);
        }

        Ok(declaration)
    }
}
