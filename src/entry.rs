use serde_json::Value;
use std::path::{Component, Path, PathBuf};

/// A declared mapping from a path under the project root to a path under the
/// webroot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEntry {
    /// Source and destination share the same relative path.
    Single(PathBuf),
    Renamed {
        source: PathBuf,
        destination: PathBuf,
    },
}
impl CopyEntry {
    pub fn source(&self) -> &Path {
        match self {
            Self::Single(path) => path,
            Self::Renamed { source, .. } => source,
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            Self::Single(path) => path,
            Self::Renamed { destination, .. } => destination,
        }
    }
}

/// One element of `copy-paths`, decoded once at configuration time.
///
/// Malformed elements are kept in place rather than rejected up front: entries
/// listed before them still get applied, and the failure surfaces when the
/// synchronizer reaches them.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSpec {
    Entry(CopyEntry),
    Unrecognised(Value),
}
impl PathSpec {
    pub fn decode(value: &Value) -> Self {
        let entry = match value {
            Value::String(path) => relative(path).map(CopyEntry::Single),
            Value::Array(pair) => match pair.as_slice() {
                [Value::String(source), Value::String(destination)] => {
                    relative(source).zip(relative(destination)).map(
                        |(source, destination)| CopyEntry::Renamed {
                            source,
                            destination,
                        },
                    )
                }
                _ => None,
            },
            _ => None,
        };

        match entry {
            Some(entry) => Self::Entry(entry),
            None => Self::Unrecognised(value.clone()),
        }
    }
}
impl From<CopyEntry> for PathSpec {
    fn from(entry: CopyEntry) -> Self {
        Self::Entry(entry)
    }
}

/// True for a non-empty relative path that cannot climb out of the directory
/// it is joined onto.
pub(crate) fn stays_inside(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && !path.has_root()
        && !path.is_absolute()
        && path
            .components()
            .all(|component| !matches!(component, Component::ParentDir | Component::Prefix(_)))
}

fn relative(path: &str) -> Option<PathBuf> {
    let path = PathBuf::from(path);

    stays_inside(&path).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_decodes_to_single() {
        let spec = PathSpec::decode(&json!("index.php"));

        assert_eq!(spec, PathSpec::Entry(CopyEntry::Single("index.php".into())));
    }

    #[test]
    fn test_pair_decodes_to_renamed() {
        let spec = PathSpec::decode(&json!(["src/theme", "wp-content/themes/custom"]));

        let PathSpec::Entry(entry) = spec else {
            panic!("expected an entry");
        };
        assert_eq!(entry.source(), Path::new("src/theme"));
        assert_eq!(entry.destination(), Path::new("wp-content/themes/custom"));
    }

    #[test]
    fn test_other_shapes_are_unrecognised() {
        for value in [
            json!(42),
            json!(null),
            json!(["a"]),
            json!(["a", "b", "c"]),
            json!(["a", 1]),
            json!({"from": "a", "to": "b"}),
        ] {
            assert_eq!(
                PathSpec::decode(&value),
                PathSpec::Unrecognised(value.clone())
            );
        }
    }

    #[test]
    fn test_absolute_and_empty_paths_are_unrecognised() {
        assert!(matches!(
            PathSpec::decode(&json!("/etc/passwd")),
            PathSpec::Unrecognised(_)
        ));
        assert!(matches!(
            PathSpec::decode(&json!(["content", "/srv/www"])),
            PathSpec::Unrecognised(_)
        ));
        assert!(matches!(
            PathSpec::decode(&json!("")),
            PathSpec::Unrecognised(_)
        ));
    }

    #[test]
    fn test_parent_components_are_unrecognised() {
        for value in [
            json!("../shared"),
            json!("content/../../etc"),
            json!(["content", "../content"]),
            json!(["../content", "content"]),
        ] {
            assert_eq!(
                PathSpec::decode(&value),
                PathSpec::Unrecognised(value.clone())
            );
        }
    }

    #[test]
    fn test_current_dir_components_are_accepted() {
        assert_eq!(
            PathSpec::decode(&json!("./content")),
            PathSpec::Entry(CopyEntry::Single("./content".into()))
        );
    }
}
