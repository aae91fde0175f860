pub mod ec2;
pub mod error;
pub mod iam;
pub mod pipeline;
pub mod rds;
pub mod s3;
pub mod stack;
pub mod token;

mod sanitize;

pub use error::{Error, Result};
pub use stack::{Resource, Stack};
pub use token::Token;
