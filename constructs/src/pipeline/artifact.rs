/// Output of one pipeline action consumed as input by another
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
}

impl Artifact {
    pub fn new(name: &str) -> Self {
        Artifact {
            name: name.to_string(),
        }
    }

    /// A file inside of the artifact
    pub fn at_path(&self, file_name: &str) -> ArtifactPath {
        ArtifactPath {
            artifact: self.clone(),
            file_name: file_name.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPath {
    pub artifact: Artifact,
    pub file_name: String,
}
