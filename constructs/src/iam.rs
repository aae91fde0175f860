use crate::sanitize::logical_id;
use crate::{Resource, Result, Stack, Token};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One statement of an IAM policy document
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<Token>,

    /// Condition operator, e.g. "StringEquals", mapped to its key/value block
    pub conditions: BTreeMap<String, Value>,
}

impl PolicyStatement {
    pub fn allow() -> Self {
        PolicyStatement {
            effect: Effect::Allow,
            actions: vec![],
            resources: vec![],
            conditions: BTreeMap::new(),
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn with_resources(mut self, resources: impl IntoIterator<Item = Token>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn with_all_resources(self) -> Self {
        self.with_resources([Token::from("*")])
    }

    pub fn with_condition(mut self, operator: &str, condition: Value) -> Self {
        self.conditions.insert(operator.to_string(), condition);
        self
    }
}

/// Single-element lists are rendered as a plain value
#[derive(Serialize)]
#[serde(untagged)]
enum OneOrMany<'a, T> {
    One(&'a T),
    Many(&'a [T]),
}

fn one_or_many<T>(items: &[T]) -> OneOrMany<'_, T> {
    match items {
        [item] => OneOrMany::One(item),
        _ => OneOrMany::Many(items),
    }
}

fn is_empty(conditions: &&BTreeMap<String, Value>) -> bool {
    conditions.is_empty()
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StatementJson<'a> {
    effect: Effect,
    action: OneOrMany<'a, String>,
    resource: OneOrMany<'a, Token>,
    #[serde(skip_serializing_if = "is_empty")]
    condition: &'a BTreeMap<String, Value>,
}

impl Serialize for PolicyStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        StatementJson {
            effect: self.effect,
            action: one_or_many(&self.actions),
            resource: one_or_many(&self.resources),
            condition: &self.conditions,
        }
        .serialize(serializer)
    }
}

/// A role which constructs grant permissions to
///
/// The role itself is defined elsewhere; statements collected here are
/// rendered into a separate `AWS::IAM::Policy` attached to it.
#[derive(Clone, Debug)]
pub struct Role {
    pub role_name: Token,
    statements: Vec<PolicyStatement>,
}

impl Role {
    pub fn new(role_name: impl Into<Token>) -> Self {
        Role {
            role_name: role_name.into(),
            statements: vec![],
        }
    }

    pub fn add_to_policy(&mut self, statement: PolicyStatement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }

    pub fn policy_document(&self) -> Value {
        json!({
            "Version": POLICY_VERSION,
            "Statement": self.statements,
        })
    }

    /// Attach collected statements to the role with an inline policy resource
    ///
    /// Nothing is added when there are no statements.
    pub fn attach_policy(&self, stack: &mut Stack, id: &str) -> Result<()> {
        if self.statements.is_empty() {
            return Ok(());
        }

        let policy_id = logical_id(&[id, "Policy"]);

        stack.add_resource(
            &policy_id,
            Resource::new(
                "AWS::IAM::Policy",
                &json!({
                    "PolicyName": policy_id,
                    "PolicyDocument": self.policy_document(),
                    "Roles": [self.role_name],
                }),
            )?,
        )
    }
}
