use super::{ClusterAttributes, ClusterRef, DatabaseClusterImportProps, Endpoint};
use crate::ec2::Connections;
use crate::{Result, Stack};

/// A cluster defined outside of the current stack
#[derive(Clone, Debug)]
pub struct ImportedDatabaseCluster {
    props: DatabaseClusterImportProps,
    attributes: ClusterAttributes,
}

impl ImportedDatabaseCluster {
    pub fn new(props: DatabaseClusterImportProps) -> Self {
        let port = props.port.clone();

        let attributes = ClusterAttributes {
            cluster_identifier: props.cluster_identifier.clone(),
            instance_identifiers: props.instance_identifiers.clone(),
            cluster_endpoint: Endpoint::new(props.cluster_endpoint_address.clone(), port.clone()),
            reader_endpoint: Endpoint::new(props.reader_endpoint_address.clone(), port.clone()),
            instance_endpoints: props
                .instance_endpoint_addresses
                .iter()
                .map(|address| Endpoint::new(address.clone(), port.clone()))
                .collect(),
            security_group_id: props.security_group_id.clone(),
            connections: Connections::new(vec![props.security_group_id.clone()], Some(port)),
        };

        ImportedDatabaseCluster { props, attributes }
    }
}

impl ClusterRef for ImportedDatabaseCluster {
    fn attributes(&self) -> &ClusterAttributes {
        &self.attributes
    }

    /// Already exported by the stack that defines it
    fn export(&self, _stack: &mut Stack) -> Result<DatabaseClusterImportProps> {
        Ok(self.props.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;

    fn props() -> DatabaseClusterImportProps {
        DatabaseClusterImportProps {
            port: "3306".into(),
            security_group_id: "sg-123".into(),
            cluster_identifier: "orders".into(),
            instance_identifiers: vec!["orders-1".into(), "orders-2".into()],
            cluster_endpoint_address: "orders.cluster.local".into(),
            reader_endpoint_address: "orders.cluster-ro.local".into(),
            instance_endpoint_addresses: vec!["orders-1.local".into(), "orders-2.local".into()],
        }
    }

    #[test]
    fn endpoints_use_imported_port() {
        let cluster = ImportedDatabaseCluster::new(props());

        assert_eq!(
            cluster.reader_endpoint(),
            &Endpoint::new("orders.cluster-ro.local".into(), "3306".into())
        );
        assert_eq!(
            cluster
                .instance_endpoints()
                .iter()
                .map(|e| e.port.clone())
                .collect::<Vec<Token>>(),
            vec![Token::from("3306"), Token::from("3306")]
        );
        assert_eq!(cluster.connections().security_group_ids, vec![Token::from("sg-123")]);
    }

    #[test]
    fn export_returns_props_without_outputs() {
        let mut stack = Stack::new("Consumer");
        let cluster = crate::rds::DatabaseCluster::import(props());

        assert_eq!(cluster.export(&mut stack).unwrap(), props());
        assert!(stack.template().unwrap().get("Outputs").is_none());
    }
}
