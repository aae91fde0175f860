use super::{
    Action, ActionBindOptions, ActionCategory, ActionConfig, ActionProperties, Artifact,
    ArtifactBounds, ArtifactPath,
};
use crate::iam::PolicyStatement;
use crate::{Error, Result, Token};
use serde::Serialize;
use serde_json::json;

const ECS_ACTIONS: [&str; 6] = [
    "ecs:DescribeServices",
    "ecs:DescribeTaskDefinition",
    "ecs:DescribeTasks",
    "ecs:ListTasks",
    "ecs:RegisterTaskDefinition",
    "ecs:UpdateService",
];

/// Services the pipeline may pass task and instance roles to
const PASSED_TO_SERVICES: [&str; 2] = ["ec2.amazonaws.com", "ecs-tasks.amazonaws.com"];

/// An existing ECS service
#[derive(Clone, Debug, PartialEq)]
pub struct EcsService {
    pub cluster_name: Token,
    pub service_name: Token,
}

/// The service to deploy to
#[derive(Clone, Debug, PartialEq)]
pub enum DeployTarget {
    Service(EcsService),
    Names {
        cluster_name: String,
        service_name: String,
    },
}

#[derive(Clone, Debug)]
pub struct EcsDeployActionProps {
    pub action_name: String,
    pub target: DeployTarget,

    /// Artifact with the image definitions JSON file, assumed to be "imagedefinitions.json"
    ///
    /// The file is a list of objects with the container `name` in the task definition
    /// and the `imageUri` to update the service with.
    /// Either this or `image_file` is required.
    pub input: Option<Artifact>,

    /// Image definitions file with a custom name, replaces `input`
    pub image_file: Option<ArtifactPath>,

    pub run_order: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EcsDeployConfiguration<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,

    cluster_name: Token,
    service_name: Token,
}

/// CodePipeline action deploying an ECS service
#[derive(Clone, Debug)]
pub struct EcsDeployAction {
    props: EcsDeployActionProps,
    properties: ActionProperties,
}

impl EcsDeployAction {
    pub fn new(props: EcsDeployActionProps) -> Result<Self> {
        let properties = ActionProperties {
            action_name: props.action_name.clone(),
            category: ActionCategory::Deploy,
            owner: "AWS",
            provider: "ECS",
            version: "1",
            artifact_bounds: ArtifactBounds::deploy(),
            inputs: vec![input_artifact(&props)?],
            outputs: vec![],
            run_order: props.run_order,
            resource: match &props.target {
                DeployTarget::Service(service) => Some(service.service_name.clone()),
                DeployTarget::Names { .. } => None,
            },
        };

        properties.validate_artifacts()?;
        Ok(EcsDeployAction { props, properties })
    }
}

/// The single artifact the action reads the image definitions from
fn input_artifact(props: &EcsDeployActionProps) -> Result<Artifact> {
    match (&props.input, &props.image_file) {
        (Some(_), Some(_)) => Err(Error::config(
            "Exactly one of 'input' or 'image_file' can be provided in the ECS deploy action",
        )),
        (Some(input), None) => Ok(input.clone()),
        (None, Some(image_file)) => Ok(image_file.artifact.clone()),
        (None, None) => Err(Error::config(
            "Specifying one of 'input' or 'image_file' is required for the ECS deploy action",
        )),
    }
}

impl Action for EcsDeployAction {
    fn properties(&self) -> &ActionProperties {
        &self.properties
    }

    fn bind(&self, options: &mut ActionBindOptions<'_>) -> Result<ActionConfig> {
        // https://docs.aws.amazon.com/codepipeline/latest/userguide/how-to-custom-role.html#how-to-update-role-new-services
        options.role.add_to_policy(
            PolicyStatement::allow()
                .with_actions(ECS_ACTIONS)
                .with_all_resources(),
        );

        options.role.add_to_policy(
            PolicyStatement::allow()
                .with_actions(["iam:PassRole"])
                .with_all_resources()
                .with_condition(
                    "StringEqualsIfExists",
                    json!({ "iam:PassedToService": PASSED_TO_SERVICES }),
                ),
        );

        options.bucket.grant_read(options.role);

        let (cluster_name, service_name) = match &self.props.target {
            DeployTarget::Service(service) => {
                (service.cluster_name.clone(), service.service_name.clone())
            }
            DeployTarget::Names {
                cluster_name,
                service_name,
            } => (cluster_name.as_str().into(), service_name.as_str().into()),
        };

        let configuration = EcsDeployConfiguration {
            file_name: self.props.image_file.as_ref().map(|f| f.file_name.as_str()),
            cluster_name,
            service_name,
        };

        Ok(ActionConfig {
            configuration: serde_json::to_value(configuration)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::Role;
    use crate::s3::Bucket;
    use serde_json::Value;

    fn props(input: Option<Artifact>, image_file: Option<ArtifactPath>) -> EcsDeployActionProps {
        EcsDeployActionProps {
            action_name: "Deploy".into(),
            target: DeployTarget::Names {
                cluster_name: "web".into(),
                service_name: "frontend".into(),
            },
            input,
            image_file,
            run_order: None,
        }
    }

    fn bind(action: &EcsDeployAction) -> (Role, ActionConfig) {
        let mut role = Role::new(Token::reference("PipelineRole"));
        let bucket = Bucket::new(Token::get_att("ArtifactsBucket", "Arn"));

        let config = action
            .bind(&mut ActionBindOptions {
                role: &mut role,
                bucket: &bucket,
            })
            .unwrap();

        (role, config)
    }

    #[test]
    fn rejects_both_inputs() {
        let build = Artifact::new("Build");
        let error =
            EcsDeployAction::new(props(Some(build.clone()), Some(build.at_path("images.json"))))
                .unwrap_err();

        assert!(matches!(error, Error::Config(ref m) if m.starts_with("Exactly one of")));
    }

    #[test]
    fn rejects_missing_input() {
        let error = EcsDeployAction::new(props(None, None)).unwrap_err();
        assert!(matches!(error, Error::Config(ref m) if m.starts_with("Specifying one of")));
    }

    #[test]
    fn image_file_artifact_becomes_input() {
        let action =
            EcsDeployAction::new(props(None, Some(Artifact::new("Build").at_path("images.json"))))
                .unwrap();

        assert_eq!(action.properties().inputs, vec![Artifact::new("Build")]);
        assert_eq!(action.properties().category, ActionCategory::Deploy);
        assert_eq!(action.properties().provider, "ECS");

        let (_, config) = bind(&action);
        assert_eq!(
            config.configuration,
            json!({
                "FileName": "images.json",
                "ClusterName": "web",
                "ServiceName": "frontend"
            })
        );
    }

    #[test]
    fn input_artifact_omits_file_name() {
        let action = EcsDeployAction::new(props(Some(Artifact::new("Build")), None)).unwrap();
        let (_, config) = bind(&action);

        assert_eq!(config.configuration.get("FileName"), None);
    }

    #[test]
    fn grants_ecs_and_pass_role() {
        let action = EcsDeployAction::new(props(Some(Artifact::new("Build")), None)).unwrap();
        let (role, _) = bind(&action);

        let statements: Vec<Value> = role
            .statements()
            .iter()
            .map(|s| serde_json::to_value(s).unwrap())
            .collect();

        assert_eq!(
            statements[0],
            json!({
                "Effect": "Allow",
                "Action": [
                    "ecs:DescribeServices",
                    "ecs:DescribeTaskDefinition",
                    "ecs:DescribeTasks",
                    "ecs:ListTasks",
                    "ecs:RegisterTaskDefinition",
                    "ecs:UpdateService"
                ],
                "Resource": "*"
            })
        );

        assert_eq!(
            statements[1],
            json!({
                "Effect": "Allow",
                "Action": "iam:PassRole",
                "Resource": "*",
                "Condition": {
                    "StringEqualsIfExists": {
                        "iam:PassedToService": ["ec2.amazonaws.com", "ecs-tasks.amazonaws.com"]
                    }
                }
            })
        );

        // Read access to the artifact bucket
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[2]["Action"][0], json!("s3:GetObject*"));
    }

    #[test]
    fn service_target_uses_service_names() {
        let service = EcsService {
            cluster_name: Token::reference("Cluster"),
            service_name: Token::get_att("Service", "Name"),
        };

        let action = EcsDeployAction::new(EcsDeployActionProps {
            target: DeployTarget::Service(service),
            run_order: Some(2),
            ..props(Some(Artifact::new("Build")), None)
        })
        .unwrap();

        assert_eq!(
            action.properties().resource,
            Some(Token::get_att("Service", "Name"))
        );

        let mut role = Role::new("pipeline");
        let bucket = Bucket::new("arn:aws:s3:::artifacts");
        let declaration = action
            .declaration(&mut ActionBindOptions {
                role: &mut role,
                bucket: &bucket,
            })
            .unwrap();

        assert_eq!(
            declaration,
            json!({
                "Name": "Deploy",
                "ActionTypeId": {
                    "Category": "Deploy",
                    "Owner": "AWS",
                    "Provider": "ECS",
                    "Version": "1"
                },
                "Configuration": {
                    "ClusterName": {"Ref": "Cluster"},
                    "ServiceName": {"Fn::GetAtt": ["Service", "Name"]}
                },
                "InputArtifacts": [{"Name": "Build"}],
                "RunOrder": 2
            })
        );
    }
}
