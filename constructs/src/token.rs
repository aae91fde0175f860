use serde::ser::{Serialize, SerializeMap, Serializer};

/// A value in a CloudFormation template
///
/// Either a literal known at synthesis time or an intrinsic function
/// resolved by CloudFormation during deployment.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Str(String),
    Num(i64),

    /// `{"Ref": logical_id}`
    Ref(String),

    /// `{"Fn::GetAtt": [logical_id, attribute]}`
    GetAtt(String, String),

    /// `{"Fn::ImportValue": export_name}`
    ImportValue(String),

    /// `{"Fn::Join": [delimiter, [parts]]}`
    Join(String, Vec<Token>),
}

impl Token {
    pub fn reference(logical_id: &str) -> Self {
        Token::Ref(logical_id.to_string())
    }

    pub fn get_att(logical_id: &str, attribute: &str) -> Self {
        Token::GetAtt(logical_id.to_string(), attribute.to_string())
    }

    pub fn join(delimiter: &str, parts: Vec<Token>) -> Self {
        Token::Join(delimiter.to_string(), parts)
    }

    /// The literal string, if the value is known at synthesis time
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the value is only known after deployment
    pub fn is_unresolved(&self) -> bool {
        !matches!(self, Token::Str(_) | Token::Num(_))
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::Str(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Str(value)
    }
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Token::Num(value)
    }
}

impl From<u16> for Token {
    fn from(value: u16) -> Self {
        Token::Num(value.into())
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Token::Str(value) => serializer.serialize_str(value),
            Token::Num(value) => serializer.serialize_i64(*value),
            Token::Ref(logical_id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", logical_id)?;
                map.end()
            }
            Token::GetAtt(logical_id, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[logical_id, attribute])?;
                map.end()
            }
            Token::ImportValue(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::ImportValue", name)?;
                map.end()
            }
            Token::Join(delimiter, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, parts))?;
                map.end()
            }
        }
    }
}
