use async_trait::async_trait;
use serde::Serialize;

/// Third-party resource types with publicly available schema handler packages
const KNOWN_TYPES: [(&str, &str); 14] = [
    (
        "Atlassian::Opsgenie::User",
        "s3://opsgeniedownloads/cloudformation/atlassian-opsgenie-user.zip",
    ),
    (
        "Atlassian::Opsgenie::Team",
        "s3://opsgeniedownloads/cloudformation/atlassian-opsgenie-team.zip",
    ),
    (
        "Atlassian::Opsgenie::Integration",
        "s3://opsgeniedownloads/cloudformation/atlassian-opsgenie-integration.zip",
    ),
    (
        "Datadog::Integrations::AWS",
        "s3://datadog-cloudformation-resources/datadog-integrations-aws/datadog-integrations-aws-1.0.1.zip",
    ),
    (
        "Datadog::Monitors::Monitor",
        "s3://datadog-cloudformation-resources/datadog-monitors-monitor/datadog-monitors-monitor-1.0.2.zip",
    ),
    (
        "Datadog::Monitors::Downtime",
        "s3://datadog-cloudformation-resources/datadog-monitors-downtime/datadog-monitors-downtime-1.0.1.zip",
    ),
    (
        "Datadog::IAM::User",
        "s3://datadog-cloudformation-resources/datadog-iam-user/datadog-iam-user-1.0.1.zip",
    ),
    (
        "Densify::Optimization::Recommendation",
        "s3://cloudformation-optimization-as-code/densify-optimization-recommendation.zip",
    ),
    (
        "Dynatrace::Installer::Agent",
        "s3://aws-dynatrace-oneagent-installer/dynatrace-installer-agent-handler-1.0-SNAPSHOT.zip",
    ),
    (
        "Fortinet::FortiGate::SystemAdmin",
        "s3://cloudformation-resource-provider/fortinet-fortigate-systemadmin.zip",
    ),
    (
        "Fortinet::FortiGate::SystemDns",
        "s3://cloudformation-resource-provider/fortinet-fortigate-systemdns.zip",
    ),
    (
        "Fortinet::FortiGate::SystemInterface",
        "s3://cloudformation-resource-provider/fortinet-fortigate-systeminterface.zip",
    ),
    (
        "NewRelic::Alerts::NrqlAlert",
        "s3://nr-cloudformation-downloads/newrelic-alerts-nrqlalert.zip",
    ),
    (
        "Spotinst::Elastigroup::Group",
        "s3://spotinst-public/integrations/cloudFormation/registry/spotinst-elastigroup-group.zip",
    ),
];

/// A resource type registered in the CloudFormation registry
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct TypeSummary {
    pub(crate) type_name: String,
    pub(crate) type_arn: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) last_updated: Option<String>,
}

/// A type name which is not in the table of known types
#[derive(Debug, PartialEq)]
pub(crate) struct UnknownTypeError(pub(crate) String);

impl std::fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "'{}' is not a known resource type", self.0)
    }
}

impl std::error::Error for UnknownTypeError {}

/// Access to the CloudFormation registry
#[async_trait]
pub(crate) trait Registry: Send + Sync {
    /// All types registered in the account and region, across all pages
    async fn list_types(&self) -> eyre::Result<Vec<TypeSummary>>;

    /// Start registering a resource type, returns the registration token if any
    async fn register_type(
        &self,
        type_name: &str,
        schema_handler_package: &str,
    ) -> eyre::Result<Option<String>>;
}

/// Custom resource types management
pub(crate) struct CustomTypes<R: Registry> {
    registry: R,
}

impl<R: Registry> CustomTypes<R> {
    pub(crate) fn new(registry: R) -> Self {
        CustomTypes { registry }
    }

    /// Registered types, an empty list when there are none
    pub(crate) async fn list_types(&self) -> eyre::Result<Vec<TypeSummary>> {
        self.registry.list_types().await
    }

    /// Register one of the known third-party types
    ///
    /// Fails with `UnknownTypeError` before calling the registry if the type is not known.
    pub(crate) async fn register_known_type(&self, type_name: &str) -> eyre::Result<Option<String>> {
        let package =
            known_type_package(type_name).ok_or_else(|| UnknownTypeError(type_name.to_string()))?;

        log::info!("Registering {type_name} from {package}");
        self.registry.register_type(type_name, package).await
    }
}

/// Known types and their schema handler packages, in the order of the table
pub(crate) fn known_types() -> impl Iterator<Item = (&'static str, &'static str)> {
    KNOWN_TYPES.into_iter()
}

fn known_type_package(type_name: &str) -> Option<&'static str> {
    KNOWN_TYPES
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, package)| *package)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory registry recording every registration request
    #[derive(Default)]
    pub(crate) struct FakeRegistry {
        pub(crate) types: Vec<TypeSummary>,
        pub(crate) registrations: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Registry for FakeRegistry {
        async fn list_types(&self) -> eyre::Result<Vec<TypeSummary>> {
            Ok(self.types.clone())
        }

        async fn register_type(
            &self,
            type_name: &str,
            schema_handler_package: &str,
        ) -> eyre::Result<Option<String>> {
            let mut registrations = self.registrations.lock().unwrap();
            registrations.push((type_name.to_string(), schema_handler_package.to_string()));
            Ok(Some(format!("token-{}", registrations.len())))
        }
    }

    #[tokio::test]
    async fn lists_nothing_when_registry_is_empty() {
        let custom_types = CustomTypes::new(FakeRegistry::default());
        assert!(custom_types.list_types().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_registered_types() {
        let custom_types = CustomTypes::new(FakeRegistry {
            types: vec![TypeSummary {
                type_name: "Datadog::IAM::User".into(),
                ..Default::default()
            }],
            ..Default::default()
        });

        let types = custom_types.list_types().await.unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].type_name, "Datadog::IAM::User");
    }

    #[tokio::test]
    async fn registers_known_type_with_its_package() {
        let custom_types = CustomTypes::new(FakeRegistry::default());

        let token = custom_types
            .register_known_type("NewRelic::Alerts::NrqlAlert")
            .await
            .unwrap();

        assert_eq!(token.as_deref(), Some("token-1"));
        assert_eq!(
            *custom_types.registry.registrations.lock().unwrap(),
            vec![(
                "NewRelic::Alerts::NrqlAlert".to_string(),
                "s3://nr-cloudformation-downloads/newrelic-alerts-nrqlalert.zip".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn unknown_type_is_rejected_without_registry_calls() {
        let custom_types = CustomTypes::new(FakeRegistry::default());

        let error = custom_types
            .register_known_type("Acme::Widgets::Widget")
            .await
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<UnknownTypeError>(),
            Some(&UnknownTypeError("Acme::Widgets::Widget".into()))
        );
        assert_eq!(
            error.to_string(),
            "'Acme::Widgets::Widget' is not a known resource type"
        );
        assert!(custom_types.registry.registrations.lock().unwrap().is_empty());
    }

    #[test]
    fn type_names_are_case_sensitive() {
        assert!(known_type_package("Datadog::IAM::User").is_some());
        assert!(known_type_package("datadog::iam::user").is_none());
    }

    #[test]
    fn known_types_keep_table_order() {
        let names: Vec<&str> = known_types().map(|(name, _)| name).collect();

        assert_eq!(names.len(), 14);
        assert_eq!(names.first(), Some(&"Atlassian::Opsgenie::User"));
        assert_eq!(names.last(), Some(&"Spotinst::Elastigroup::Group"));
    }
}
