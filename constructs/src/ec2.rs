use crate::sanitize::logical_id;
use crate::{Error, Resource, Result, Stack, Token};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubnetType {
    /// Routed to an internet gateway
    Public,

    /// Outbound internet access through a NAT gateway
    Private,

    /// No internet access
    Isolated,
}

#[derive(Clone, Debug)]
pub struct Subnet {
    pub subnet_id: Token,
    pub subnet_type: SubnetType,

    /// Name of the subnet group the subnet belongs to
    pub name: String,

    pub availability_zone: String,

    /// Logical ids of resources that must exist before anything in the subnet
    /// can reach the internet (routes, NAT gateways)
    pub internet_connectivity_established: Vec<String>,
}

/// Which subnets of a VPC to place resources in
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VpcPlacement {
    pub subnets_to_use: Option<SubnetType>,

    /// Takes precedence over the subnet type
    pub subnet_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Vpc {
    pub vpc_id: Token,
    pub subnets: Vec<Subnet>,
}

impl Vpc {
    /// Subnets matching the placement, private subnets by default
    pub fn select_subnets(&self, placement: Option<&VpcPlacement>) -> Vec<&Subnet> {
        let placement = placement.cloned().unwrap_or_default();

        if let Some(name) = placement.subnet_name {
            return self.subnets.iter().filter(|s| s.name == name).collect();
        }

        let subnet_type = placement.subnets_to_use.unwrap_or(SubnetType::Private);

        self.subnets
            .iter()
            .filter(|s| s.subnet_type == subnet_type)
            .collect()
    }
}

/// EC2 instance type, e.g. "r5.large"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceType(String);

impl InstanceType {
    pub fn new(identifier: &str) -> Self {
        InstanceType(identifier.to_string())
    }

    pub fn of(class: &str, size: &str) -> Self {
        InstanceType(format!("{class}.{size}"))
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EgressRule {
    cidr_ip: &'static str,
    ip_protocol: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupProperties<'a> {
    group_description: &'a str,
    vpc_id: &'a Token,
    security_group_egress: Vec<EgressRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupIngressProperties<'a> {
    group_id: &'a Token,
    source_security_group_id: &'a Token,
    ip_protocol: &'static str,
    from_port: &'a Token,
    to_port: &'a Token,
    description: &'a str,
}

/// A security group allowing all outbound traffic
#[derive(Clone, Debug, PartialEq)]
pub struct SecurityGroup {
    pub logical_id: String,
    pub security_group_id: Token,
}

impl SecurityGroup {
    /// Declare a new security group, the resource is returned to the caller to add to a stack
    pub fn declare(logical_id: &str, description: &str, vpc: &Vpc) -> Result<(Self, Resource)> {
        let resource = Resource::new(
            "AWS::EC2::SecurityGroup",
            &SecurityGroupProperties {
                group_description: description,
                vpc_id: &vpc.vpc_id,
                security_group_egress: vec![EgressRule {
                    cidr_ip: "0.0.0.0/0",
                    ip_protocol: "-1",
                    description: "Allow all outbound traffic by default",
                }],
            },
        )?;

        let group = SecurityGroup {
            logical_id: logical_id.to_string(),
            security_group_id: Token::get_att(logical_id, "GroupId"),
        };

        Ok((group, resource))
    }
}

/// Network access to a resource: its security groups and the port it listens on
#[derive(Clone, Debug, PartialEq)]
pub struct Connections {
    pub security_group_ids: Vec<Token>,
    pub default_port: Option<Token>,
}

impl Connections {
    pub fn new(security_group_ids: Vec<Token>, default_port: Option<Token>) -> Self {
        Connections {
            security_group_ids,
            default_port,
        }
    }

    /// Allow TCP traffic on the default port from the security groups of `other`
    ///
    /// Adds one ingress rule per pair of security groups.
    pub fn allow_default_port_from(
        &self,
        stack: &mut Stack,
        id: &str,
        other: &Connections,
        description: &str,
    ) -> Result<()> {
        let port = self
            .default_port
            .as_ref()
            .ok_or_else(|| Error::config("Cannot allow default port: no default port configured"))?;

        let pairs: Vec<(&Token, &Token)> = self
            .security_group_ids
            .iter()
            .flat_map(|own| other.security_group_ids.iter().map(move |peer| (own, peer)))
            .collect();

        let is_single = pairs.len() == 1;
        let mut rules = vec![];

        for (index, (own, peer)) in pairs.into_iter().enumerate() {
            let rule_id = if is_single {
                logical_id(&[id])
            } else {
                logical_id(&[id, &(index + 1).to_string()])
            };

            let resource = Resource::new(
                "AWS::EC2::SecurityGroupIngress",
                &SecurityGroupIngressProperties {
                    group_id: own,
                    source_security_group_id: peer,
                    ip_protocol: "tcp",
                    from_port: port,
                    to_port: port,
                    description,
                },
            )?;

            rules.push((rule_id, resource));
        }

        stack.add_resources(rules)
    }
}
