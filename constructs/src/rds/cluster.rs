use super::imported::ImportedDatabaseCluster;
use super::{
    BaseClusterProps, ClusterAttributes, ClusterRef, DatabaseClusterEngine,
    DatabaseClusterEngineMode, DatabaseClusterImportProps, Endpoint, ProvisionedClusterProps,
    ScalingConfiguration, ServerlessClusterProps,
};
use crate::ec2::{Connections, SecurityGroup, Subnet, SubnetType};
use crate::sanitize::{logical_id, DEFAULT_CHILD_ID};
use crate::{Error, Resource, Result, Stack, Token};
use serde::Serialize;

const DEFAULT_INSTANCE_COUNT: u32 = 2;

#[derive(Serialize)]
struct DbSubnetGroupProperties<'a> {
    #[serde(rename = "DBSubnetGroupDescription")]
    description: String,

    #[serde(rename = "SubnetIds")]
    subnet_ids: Vec<&'a Token>,
}

/// Cluster properties specific to provisioned or serverless mode
#[derive(Default, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ClusterExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    kms_key_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    storage_encrypted: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    engine_mode: Option<DatabaseClusterEngineMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    scaling_configuration: Option<ScalingConfiguration>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DbClusterProperties<'a> {
    engine: DatabaseClusterEngine,

    #[serde(rename = "DBClusterIdentifier", skip_serializing_if = "Option::is_none")]
    cluster_identifier: Option<&'a str>,

    #[serde(rename = "DBSubnetGroupName")]
    subnet_group_name: Token,

    vpc_security_group_ids: Vec<&'a Token>,

    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,

    #[serde(
        rename = "DBClusterParameterGroupName",
        skip_serializing_if = "Option::is_none"
    )]
    parameter_group_name: Option<&'a str>,

    master_username: &'a str,
    master_user_password: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    backup_retention_period: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    preferred_backup_window: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    preferred_maintenance_window: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    database_name: Option<&'a str>,

    #[serde(flatten)]
    extras: ClusterExtras,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DbInstanceProperties {
    engine: DatabaseClusterEngine,

    #[serde(rename = "DBClusterIdentifier")]
    cluster_identifier: Token,

    #[serde(rename = "DBInstanceIdentifier", skip_serializing_if = "Option::is_none")]
    instance_identifier: Option<String>,

    #[serde(rename = "DBInstanceClass")]
    instance_class: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    publicly_accessible: Option<bool>,

    #[serde(rename = "DBSubnetGroupName")]
    subnet_group_name: Token,
}

/// Resources and attributes shared by provisioned and serverless clusters
///
/// Resources are collected first and added to the stack in one go by `commit`.
struct BaseCluster<'p> {
    id: String,
    subnets: Vec<&'p Subnet>,
    subnet_group_id: String,
    cluster_id: String,
    attributes: ClusterAttributes,
    resources: Vec<(String, Resource)>,
}

impl<'p> BaseCluster<'p> {
    fn new(id: &str, props: &'p BaseClusterProps, extras: ClusterExtras) -> Result<Self> {
        let vpc = &props.vpc_props.vpc;
        let subnets = vpc.select_subnets(props.vpc_props.placement.as_ref());

        // Cannot check whether the subnets are in different AZs, only their amount
        if subnets.len() < 2 {
            return Err(Error::config(format!(
                "Cluster requires at least 2 subnets, got {}",
                subnets.len()
            )));
        }

        let subnet_group_id = logical_id(&[id, "Subnets"]);
        let subnet_group = Resource::new(
            "AWS::RDS::DBSubnetGroup",
            &DbSubnetGroupProperties {
                description: format!("Subnets for {id} database"),
                subnet_ids: subnets.iter().map(|s| &s.subnet_id).collect(),
            },
        )?;

        let (security_group, security_group_resource) = SecurityGroup::declare(
            &logical_id(&[id, "SecurityGroup"]),
            "RDS security group",
            vpc,
        )?;

        let cluster_id = logical_id(&[id, DEFAULT_CHILD_ID]);
        let cluster = Resource::new(
            "AWS::RDS::DBCluster",
            &DbClusterProperties {
                engine: props.engine,
                cluster_identifier: props.cluster_identifier.as_deref(),
                subnet_group_name: Token::reference(&subnet_group_id),
                vpc_security_group_ids: vec![&security_group.security_group_id],
                port: props.port,
                parameter_group_name: props.parameter_group_name.as_deref(),
                master_username: &props.master_user.username,
                master_user_password: &props.master_user.password,
                backup_retention_period: props.backup.as_ref().map(|b| b.retention_days),
                preferred_backup_window: props
                    .backup
                    .as_ref()
                    .and_then(|b| b.preferred_window.as_deref()),
                preferred_maintenance_window: props.preferred_maintenance_window.as_deref(),
                database_name: props.default_database_name.as_deref(),
                extras,
            },
        )?;

        let port = Token::get_att(&cluster_id, "Endpoint.Port");

        let attributes = ClusterAttributes {
            cluster_identifier: Token::reference(&cluster_id),
            instance_identifiers: vec![],
            cluster_endpoint: Endpoint::new(
                Token::get_att(&cluster_id, "Endpoint.Address"),
                port.clone(),
            ),
            reader_endpoint: Endpoint::new(
                Token::get_att(&cluster_id, "ReadEndpoint.Address"),
                port.clone(),
            ),
            instance_endpoints: vec![],
            security_group_id: security_group.security_group_id.clone(),
            connections: Connections::new(vec![security_group.security_group_id], Some(port)),
        };

        Ok(BaseCluster {
            id: id.to_string(),
            subnets,
            resources: vec![
                (subnet_group_id.clone(), subnet_group),
                (security_group.logical_id, security_group_resource),
                (cluster_id.clone(), cluster),
            ],
            subnet_group_id,
            cluster_id,
            attributes,
        })
    }

    fn commit(self, stack: &mut Stack) -> Result<(String, ClusterAttributes)> {
        stack.add_resources(self.resources)?;
        Ok((self.id, self.attributes))
    }
}

/// Identifier of the n-th instance (1-based)
fn instance_identifier(props: &BaseClusterProps, index: u32) -> Option<String> {
    match (&props.instance_identifier_base, &props.cluster_identifier) {
        (Some(base), _) => Some(format!("{base}{index}")),
        (None, Some(cluster)) => Some(format!("{cluster}instance{index}")),
        (None, None) => None,
    }
}

/// Add outputs with exports for every attribute of a cluster
///
/// Nothing is added if any of the output ids is already taken.
fn export_attributes(
    stack: &mut Stack,
    id: &str,
    attributes: &ClusterAttributes,
) -> Result<DatabaseClusterImportProps> {
    let instance_count = attributes.instance_identifiers.len();
    let endpoint_count = attributes.instance_endpoints.len();

    let mut outputs = vec![
        ("Port".to_string(), &attributes.cluster_endpoint.port),
        ("SecurityGroupId".to_string(), &attributes.security_group_id),
        ("ClusterIdentifier".to_string(), &attributes.cluster_identifier),
        (
            "ClusterEndpointAddress".to_string(),
            &attributes.cluster_endpoint.hostname,
        ),
        (
            "ReaderEndpointAddress".to_string(),
            &attributes.reader_endpoint.hostname,
        ),
    ];

    outputs.extend(
        attributes
            .instance_identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| (format!("InstanceIdentifiers{}", index + 1), identifier)),
    );

    outputs.extend(
        attributes
            .instance_endpoints
            .iter()
            .enumerate()
            .map(|(index, endpoint)| {
                (
                    format!("InstanceEndpointAddresses{}", index + 1),
                    &endpoint.hostname,
                )
            }),
    );

    let outputs = outputs
        .into_iter()
        .map(|(name, value)| (logical_id(&[id, &name]), value.clone()))
        .collect();

    let mut tokens = stack.add_outputs(outputs, true)?.into_iter();
    let mut next = || tokens.next().ok_or_else(|| Error::config("Missing exported output"));

    let port = next()?;
    let security_group_id = next()?;
    let cluster_identifier = next()?;
    let cluster_endpoint_address = next()?;
    let reader_endpoint_address = next()?;

    let instance_identifiers = (0..instance_count)
        .map(|_| next())
        .collect::<Result<Vec<Token>>>()?;

    let instance_endpoint_addresses = (0..endpoint_count)
        .map(|_| next())
        .collect::<Result<Vec<Token>>>()?;

    Ok(DatabaseClusterImportProps {
        port,
        security_group_id,
        cluster_identifier,
        instance_identifiers,
        cluster_endpoint_address,
        reader_endpoint_address,
        instance_endpoint_addresses,
    })
}

/// A clustered database with a given number of instances
#[derive(Clone, Debug)]
pub struct DatabaseCluster {
    id: String,
    attributes: ClusterAttributes,
}

impl DatabaseCluster {
    pub fn new(stack: &mut Stack, id: &str, props: &ProvisionedClusterProps) -> Result<Self> {
        let mut base = BaseCluster::new(
            id,
            &props.base,
            ClusterExtras {
                kms_key_id: props.kms_key_arn.clone(),
                storage_encrypted: Some(props.kms_key_arn.is_some()),
                ..Default::default()
            },
        )?;

        let instance_count = props.instances.unwrap_or(DEFAULT_INSTANCE_COUNT);

        if instance_count < 1 {
            return Err(Error::config("At least one instance is required"));
        }

        let publicly_accessible = props
            .base
            .vpc_props
            .placement
            .as_ref()
            .map(|p| p.subnets_to_use == Some(SubnetType::Public));

        // Instances can't be created before the subnets have a route to the internet
        let dependencies: Vec<String> = base
            .subnets
            .iter()
            .flat_map(|s| s.internet_connectivity_established.iter().cloned())
            .collect();

        for index in 1..=instance_count {
            let instance_id = logical_id(&[id, &format!("Instance{index}")]);

            let instance = Resource::new(
                "AWS::RDS::DBInstance",
                &DbInstanceProperties {
                    engine: props.base.engine,
                    cluster_identifier: Token::reference(&base.cluster_id),
                    instance_identifier: instance_identifier(&props.base, index),
                    instance_class: format!("db.{}", props.instance_props.instance_type),
                    publicly_accessible,
                    // Already set on the cluster, repeated for the instance
                    subnet_group_name: Token::reference(&base.subnet_group_id),
                },
            )?
            .with_dependencies(dependencies.clone());

            base.attributes
                .instance_identifiers
                .push(Token::reference(&instance_id));

            base.attributes.instance_endpoints.push(Endpoint::new(
                Token::get_att(&instance_id, "Endpoint.Address"),
                Token::get_att(&instance_id, "Endpoint.Port"),
            ));

            base.resources.push((instance_id, instance));
        }

        let (id, attributes) = base.commit(stack)?;
        Ok(DatabaseCluster { id, attributes })
    }

    /// Reference a cluster defined in another stack
    pub fn import(props: DatabaseClusterImportProps) -> ImportedDatabaseCluster {
        ImportedDatabaseCluster::new(props)
    }
}

impl ClusterRef for DatabaseCluster {
    fn attributes(&self) -> &ClusterAttributes {
        &self.attributes
    }

    fn export(&self, stack: &mut Stack) -> Result<DatabaseClusterImportProps> {
        export_attributes(stack, &self.id, &self.attributes)
    }
}

/// A cluster running in serverless engine mode
#[derive(Clone, Debug)]
pub struct ServerlessCluster {
    id: String,
    attributes: ClusterAttributes,
    scaling_configuration: ScalingConfiguration,
}

impl ServerlessCluster {
    pub fn new(stack: &mut Stack, id: &str, props: &ServerlessClusterProps) -> Result<Self> {
        let scaling_configuration = props
            .scaling_configuration
            .unwrap_or_default()
            .merged_over(&ScalingConfiguration::DEFAULT_SERVERLESS);

        let base = BaseCluster::new(
            id,
            &props.base,
            ClusterExtras {
                engine_mode: Some(DatabaseClusterEngineMode::Serverless),
                scaling_configuration: Some(scaling_configuration),
                ..Default::default()
            },
        )?;

        let (id, attributes) = base.commit(stack)?;

        Ok(ServerlessCluster {
            id,
            attributes,
            scaling_configuration,
        })
    }

    /// Effective scaling configuration, defaults included
    pub fn scaling_configuration(&self) -> &ScalingConfiguration {
        &self.scaling_configuration
    }
}

impl ClusterRef for ServerlessCluster {
    fn attributes(&self) -> &ClusterAttributes {
        &self.attributes
    }

    fn export(&self, stack: &mut Stack) -> Result<DatabaseClusterImportProps> {
        export_attributes(stack, &self.id, &self.attributes)
    }
}
