mod cluster;
mod endpoint;
mod imported;
pub mod props;

pub use cluster::{DatabaseCluster, ServerlessCluster};
pub use endpoint::Endpoint;
pub use imported::ImportedDatabaseCluster;
pub use props::*;

use crate::ec2::Connections;
use crate::{Result, Stack, Token};

/// Everything other constructs need to know to talk to a cluster
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterAttributes {
    pub cluster_identifier: Token,
    pub instance_identifiers: Vec<Token>,

    /// For read/write operations
    pub cluster_endpoint: Endpoint,

    /// Load-balanced read-only operations
    pub reader_endpoint: Endpoint,

    /// One per instance
    pub instance_endpoints: Vec<Endpoint>,

    pub security_group_id: Token,
    pub connections: Connections,
}

/// Values needed to use a cluster from another stack
#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseClusterImportProps {
    pub port: Token,
    pub security_group_id: Token,
    pub cluster_identifier: Token,
    pub instance_identifiers: Vec<Token>,
    pub cluster_endpoint_address: Token,
    pub reader_endpoint_address: Token,
    pub instance_endpoint_addresses: Vec<Token>,
}

/// A cluster either defined in this stack or imported
pub trait ClusterRef {
    fn attributes(&self) -> &ClusterAttributes;

    /// Make the cluster available for importing in other stacks
    fn export(&self, stack: &mut Stack) -> Result<DatabaseClusterImportProps>;

    fn cluster_identifier(&self) -> &Token {
        &self.attributes().cluster_identifier
    }

    fn instance_identifiers(&self) -> &[Token] {
        &self.attributes().instance_identifiers
    }

    fn cluster_endpoint(&self) -> &Endpoint {
        &self.attributes().cluster_endpoint
    }

    fn reader_endpoint(&self) -> &Endpoint {
        &self.attributes().reader_endpoint
    }

    fn instance_endpoints(&self) -> &[Endpoint] {
        &self.attributes().instance_endpoints
    }

    fn security_group_id(&self) -> &Token {
        &self.attributes().security_group_id
    }

    fn connections(&self) -> &Connections {
        &self.attributes().connections
    }
}
