use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("Static regex must compile"));

/// Child id of the primary resource of a construct
pub(crate) const DEFAULT_CHILD_ID: &str = "Resource";

/// Build a template logical id out of construct path components
///
/// CloudFormation only accepts alphanumerics here, everything else is dropped.
/// The "Resource" component is skipped so that the primary resource of a construct
/// is addressed by the construct id itself.
pub(crate) fn logical_id(path: &[&str]) -> String {
    path.iter()
        .filter(|component| **component != DEFAULT_CHILD_ID)
        .map(|component| NON_ALPHANUMERIC.replace_all(component, "").into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_unsupported_characters() {
        assert_eq!(logical_id(&["my-db", "Sub_nets"]), "mydbSubnets");
    }

    #[test]
    fn skips_default_child() {
        assert_eq!(logical_id(&["Database", "Resource"]), "Database");
        assert_eq!(logical_id(&["Database", "Instance1"]), "DatabaseInstance1");
    }
}
