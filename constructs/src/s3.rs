use crate::iam::{PolicyStatement, Role};
use crate::Token;

/// A bucket referenced by its ARN
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub bucket_arn: Token,
}

impl Bucket {
    pub fn new(bucket_arn: impl Into<Token>) -> Self {
        Bucket {
            bucket_arn: bucket_arn.into(),
        }
    }

    /// ARN matching every object in the bucket
    pub fn objects_arn(&self) -> Token {
        Token::join("", vec![self.bucket_arn.clone(), "/*".into()])
    }

    /// Allow the role to read the bucket and its objects
    pub fn grant_read(&self, role: &mut Role) {
        role.add_to_policy(
            PolicyStatement::allow()
                .with_actions(["s3:GetObject*", "s3:GetBucket*", "s3:List*"])
                .with_resources([self.bucket_arn.clone(), self.objects_arn()]),
        );
    }
}
