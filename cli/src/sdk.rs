use crate::config::AwsSection;
use crate::types::{Registry, TypeSummary};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::types::RegistryType;
use eyre::{ContextCompat, WrapErr};

/// What a CloudFormation client is going to be used for
///
/// Only a logging hint, both modes get the same client and credentials.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Mode {
    ForReading,
    ForWriting,
}

/// AWS access with credentials from the default chain or a named profile
pub(crate) struct Sdk {
    config: SdkConfig,
}

impl Sdk {
    pub(crate) async fn new(aws: &AwsSection) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &aws.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = &aws.region {
            loader = loader.region(Region::new(region.clone()));
        }

        Sdk {
            config: loader.load().await,
        }
    }

    /// Account of the resolved credentials
    pub(crate) async fn default_account(&self) -> eyre::Result<String> {
        aws_sdk_sts::Client::new(&self.config)
            .get_caller_identity()
            .send()
            .await
            .wrap_err("Failed to get caller identity")?
            .account()
            .map(String::from)
            .wrap_err("No account in caller identity")
    }

    pub(crate) fn default_region(&self) -> eyre::Result<String> {
        self.config
            .region()
            .map(|region| region.to_string())
            .wrap_err("No region configured, set it in cdk.toml or with --region")
    }

    /// CloudFormation client for the default account and region
    async fn cloudformation(&self, mode: Mode) -> eyre::Result<aws_sdk_cloudformation::Client> {
        let account = self.default_account().await?;
        let region = self.default_region()?;
        log::debug!("CloudFormation client for {account} in {region} ({mode:?})");
        Ok(aws_sdk_cloudformation::Client::new(&self.config))
    }
}

impl From<&aws_sdk_cloudformation::types::TypeSummary> for TypeSummary {
    fn from(summary: &aws_sdk_cloudformation::types::TypeSummary) -> Self {
        TypeSummary {
            type_name: summary.type_name().unwrap_or_default().to_string(),
            type_arn: summary.type_arn().map(String::from),
            description: summary.description().map(String::from),
            last_updated: summary.last_updated().map(|date| date.to_string()),
        }
    }
}

#[async_trait]
impl Registry for Sdk {
    async fn list_types(&self) -> eyre::Result<Vec<TypeSummary>> {
        let client = self.cloudformation(Mode::ForReading).await?;
        let mut next_token = None;
        let mut types = Vec::new();

        loop {
            let mut request = client.list_types();

            if let Some(token) = next_token {
                request = request.next_token(token);
            }

            let response = request
                .send()
                .await
                .wrap_err("Failed to list registered types")?;

            types.extend(response.type_summaries().iter().map(TypeSummary::from));

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(types)
    }

    async fn register_type(
        &self,
        type_name: &str,
        schema_handler_package: &str,
    ) -> eyre::Result<Option<String>> {
        let response = self
            .cloudformation(Mode::ForWriting)
            .await?
            .register_type()
            .r#type(RegistryType::Resource)
            .type_name(type_name)
            .schema_handler_package(schema_handler_package)
            .send()
            .await
            .wrap_err(format!("Failed to register {type_name}"))?;

        Ok(response.registration_token().map(String::from))
    }
}
