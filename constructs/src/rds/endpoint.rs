use crate::Token;

/// Connection endpoint of a database
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub hostname: Token,
    pub port: Token,
}

impl Endpoint {
    pub fn new(hostname: Token, port: Token) -> Self {
        Endpoint { hostname, port }
    }

    /// "hostname:port"
    pub fn socket_address(&self) -> Token {
        Token::join(":", vec![self.hostname.clone(), self.port.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn socket_address_joins_host_and_port() {
        let endpoint = Endpoint::new("db.local".into(), Token::get_att("Db", "Endpoint.Port"));

        assert_eq!(
            serde_json::to_value(endpoint.socket_address()).unwrap(),
            json!({"Fn::Join": [":", ["db.local", {"Fn::GetAtt": ["Db", "Endpoint.Port"]}]]})
        );
    }
}
