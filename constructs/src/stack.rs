use crate::{Error, Result, Token};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single resource declaration in the template
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub type_name: String,

    pub properties: Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Resource {
    /// Declare a resource from any serializable set of properties
    pub fn new(type_name: &str, properties: &impl Serialize) -> Result<Self> {
        Ok(Resource {
            type_name: type_name.to_string(),
            properties: serde_json::to_value(properties)?,
            depends_on: vec![],
        })
    }

    /// Make the resource wait for other resources, duplicates are dropped
    pub fn with_dependencies(mut self, logical_ids: impl IntoIterator<Item = String>) -> Self {
        for id in logical_ids {
            if !self.depends_on.contains(&id) {
                self.depends_on.push(id);
            }
        }

        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Token,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: String,
}

/// Collects resources and outputs of one synthesis pass
///
/// Renders into a CloudFormation template. Logical ids are unique within a stack.
#[derive(Clone, Debug, Default)]
pub struct Stack {
    name: String,
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl Stack {
    pub fn new(name: &str) -> Self {
        Stack {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_resource(&mut self, logical_id: &str, resource: Resource) -> Result<()> {
        self.add_resources(vec![(logical_id.to_string(), resource)])
    }

    /// Add a group of resources at once
    ///
    /// Either all resources are added or none
    pub fn add_resources(&mut self, resources: Vec<(String, Resource)>) -> Result<()> {
        for (index, (logical_id, _)) in resources.iter().enumerate() {
            if logical_id.is_empty() {
                return Err(Error::config("Logical id of a resource can not be empty"));
            }

            let is_repeated = resources[..index].iter().any(|(id, _)| id == logical_id);

            if is_repeated || self.resources.contains_key(logical_id) {
                return Err(Error::config(format!(
                    "There is already a resource with logical id '{logical_id}' in stack '{}'",
                    self.name
                )));
            }
        }

        for (logical_id, resource) in resources {
            log::debug!("Adding {} as {logical_id}", resource.type_name);
            self.resources.insert(logical_id, resource);
        }

        Ok(())
    }

    /// Add a stack output
    ///
    /// When exported, the output is named `<stack>:<logical id>` and the returned token
    /// imports it in other stacks. Otherwise the original value is returned.
    pub fn add_output(&mut self, logical_id: &str, value: Token, export: bool) -> Result<Token> {
        let mut tokens = self.add_outputs(vec![(logical_id.to_string(), value)], export)?;
        tokens.pop().ok_or_else(|| Error::config("No output was added"))
    }

    /// Add a group of outputs at once, returns their tokens in the same order
    ///
    /// Either all outputs are added or none
    pub fn add_outputs(&mut self, outputs: Vec<(String, Token)>, export: bool) -> Result<Vec<Token>> {
        for (index, (logical_id, _)) in outputs.iter().enumerate() {
            let is_repeated = outputs[..index].iter().any(|(id, _)| id == logical_id);

            if is_repeated || self.outputs.contains_key(logical_id) {
                return Err(Error::config(format!(
                    "There is already an output with logical id '{logical_id}' in stack '{}'",
                    self.name
                )));
            }
        }

        let mut tokens = Vec::with_capacity(outputs.len());

        for (logical_id, value) in outputs {
            let export = export.then(|| Export {
                name: format!("{}:{logical_id}", self.name),
            });

            tokens.push(match &export {
                Some(Export { name }) => Token::ImportValue(name.clone()),
                None => value.clone(),
            });

            self.outputs.insert(logical_id, Output { value, export });
        }

        Ok(tokens)
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&String, &Resource)> {
        self.resources.iter()
    }

    /// All resources of a CloudFormation type, e.g. "AWS::RDS::DBInstance"
    pub fn resources_of_type<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Resource)> {
        self.resources
            .iter()
            .filter(move |(_, resource)| resource.type_name == type_name)
    }

    pub fn output(&self, logical_id: &str) -> Option<&Output> {
        self.outputs.get(logical_id)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&String, &Output)> {
        self.outputs.iter()
    }

    /// The template as a JSON value
    pub fn template(&self) -> Result<Value> {
        let mut template = Map::new();
        template.insert("Resources".into(), serde_json::to_value(&self.resources)?);

        if !self.outputs.is_empty() {
            template.insert("Outputs".into(), serde_json::to_value(&self.outputs)?);
        }

        Ok(Value::Object(template))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.template()?)?)
    }
}
