use crate::ec2::{InstanceType, Vpc, VpcPlacement};
use serde::Serialize;

/// Is the cluster provisioned or serverless
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseClusterEngineMode {
    Provisioned,
    Serverless,
}

/// The engine for the database cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseClusterEngine {
    /// Aurora MySQL 5.6
    Aurora,

    /// Aurora MySQL 5.7
    AuroraMysql,

    AuroraPostgresql,
    Neptune,
}

impl DatabaseClusterEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseClusterEngine::Aurora => "aurora",
            DatabaseClusterEngine::AuroraMysql => "aurora-mysql",
            DatabaseClusterEngine::AuroraPostgresql => "aurora-postgresql",
            DatabaseClusterEngine::Neptune => "neptune",
        }
    }
}

/// Instance properties for database instances
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceProps {
    /// What type of instance to start for the replicas
    pub instance_type: InstanceType,
}

#[derive(Clone, Debug)]
pub struct VpcProps {
    /// Must provide at least 2 subnets, in two different AZs
    pub vpc: Vpc,

    pub placement: Option<VpcPlacement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackupProps {
    pub retention_days: u32,

    /// Daily time range in UTC, at least 30 minutes long, e.g. "01:00-02:00"
    pub preferred_window: Option<String>,
}

/// Credentials of the administrative user
#[derive(Clone, Debug, PartialEq)]
pub struct Login {
    pub username: String,

    /// Do not hardcode it, read it from a stack parameter or the parameter store instead
    pub password: String,
}

/// Properties shared by provisioned and serverless clusters
#[derive(Clone, Debug)]
pub struct BaseClusterProps {
    pub engine: DatabaseClusterEngine,
    pub vpc_props: VpcProps,
    pub master_user: Login,
    pub backup: Option<BackupProps>,

    /// Engine default when not set
    pub port: Option<u16>,

    /// Generated by CloudFormation when not set
    pub cluster_identifier: Option<String>,

    /// Every instance is named by appending its 1-based number to this string
    ///
    /// Falls back to the cluster identifier followed by "instance". If that is also not set,
    /// the identifiers are generated.
    pub instance_identifier_base: Option<String>,

    /// Name of a database created automatically inside the cluster
    pub default_database_name: Option<String>,

    pub parameter_group_name: Option<String>,

    /// Weekly time range in UTC, e.g. "Sun:23:45-Mon:00:15"
    pub preferred_maintenance_window: Option<String>,
}

impl BaseClusterProps {
    pub fn new(engine: DatabaseClusterEngine, vpc_props: VpcProps, master_user: Login) -> Self {
        BaseClusterProps {
            engine,
            vpc_props,
            master_user,
            backup: None,
            port: None,
            cluster_identifier: None,
            instance_identifier_base: None,
            default_database_name: None,
            parameter_group_name: None,
            preferred_maintenance_window: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProvisionedClusterProps {
    pub base: BaseClusterProps,
    pub instance_props: InstanceProps,

    /// How many instances to create, at least one, 2 by default
    pub instances: Option<u32>,

    /// Enables storage encryption with the key
    pub kms_key_arn: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServerlessClusterProps {
    /// Only the Aurora MySQL 5.6 engine is supported for serverless clusters
    pub base: BaseClusterProps,

    /// Merged over the default scaling configuration
    pub scaling_configuration: Option<ScalingConfiguration>,
}

/// How a serverless cluster scales
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_pause: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_capacity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_until_auto_pause: Option<u32>,
}

impl ScalingConfiguration {
    pub const DEFAULT_SERVERLESS: ScalingConfiguration = ScalingConfiguration {
        auto_pause: Some(true),
        max_capacity: Some(8),
        min_capacity: Some(2),
        seconds_until_auto_pause: Some(300),
    };

    /// Shallow merge, every field set in `self` wins over `defaults`
    pub fn merged_over(&self, defaults: &ScalingConfiguration) -> ScalingConfiguration {
        ScalingConfiguration {
            auto_pause: self.auto_pause.or(defaults.auto_pause),
            max_capacity: self.max_capacity.or(defaults.max_capacity),
            min_capacity: self.min_capacity.or(defaults.min_capacity),
            seconds_until_auto_pause: self
                .seconds_until_auto_pause
                .or(defaults.seconds_until_auto_pause),
        }
    }
}
