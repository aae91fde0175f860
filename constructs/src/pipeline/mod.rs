pub mod action;
pub mod artifact;
pub mod ecs_deploy;

pub use action::{
    Action, ActionBindOptions, ActionCategory, ActionConfig, ActionProperties, ArtifactBounds,
};
pub use artifact::{Artifact, ArtifactPath};
pub use ecs_deploy::{DeployTarget, EcsDeployAction, EcsDeployActionProps, EcsService};
