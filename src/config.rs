use crate::entry::{stays_inside, PathSpec};
use miette::Diagnostic;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WEBROOT_DIR_KEY: &str = "webroot-dir";
pub const SECTION_KEY: &str = "wordpress";
pub const COPY_PATHS_KEY: &str = "copy-paths";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("missing required 'webroot-dir' in extra metadata")]
    #[diagnostic(
        code(webroot_sync::config::missing_webroot_dir),
        help("Set extra.webroot-dir in your manifest, e.g. \"public\"")
    )]
    MissingWebrootDir,

    #[error("'webroot-dir' must be a relative path inside the project, found: {found}")]
    #[diagnostic(code(webroot_sync::config::invalid_webroot_dir))]
    InvalidWebrootDir { found: Value },

    #[error("'{key}' must be {expected}, found: {found}")]
    #[diagnostic(code(webroot_sync::config::invalid_copy_paths))]
    InvalidCopyPaths {
        key: String,
        expected: &'static str,
        found: Value,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("Unrecognised path format: {value}")]
    #[diagnostic(
        code(webroot_sync::config::unrecognised_path_format),
        help("Use a relative path string, or a [source, destination] pair of relative paths")
    )]
    UnrecognisedPathFormat { value: Value },
}

/// Resolved synchronizer configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub webroot_dir: PathBuf,
    /// Listed order is preserved; later entries win on overlapping destinations.
    pub copy_paths: Vec<PathSpec>,
}
impl Settings {
    /// Reads `webroot-dir` and `wordpress.copy-paths` out of the extra metadata.
    ///
    /// A missing `copy-paths` resolves to an empty list.
    pub fn from_extra(extra: &Map<String, Value>) -> Result<Self, ConfigError> {
        let webroot_dir = match extra.get(WEBROOT_DIR_KEY) {
            None => return Err(ConfigError::MissingWebrootDir),
            Some(Value::String(dir)) if stays_inside(Path::new(dir)) => PathBuf::from(dir),
            Some(other) => {
                return Err(ConfigError::InvalidWebrootDir {
                    found: other.clone(),
                })
            }
        };

        let copy_paths = match extra.get(SECTION_KEY) {
            None => Vec::new(),
            Some(Value::Object(section)) => match section.get(COPY_PATHS_KEY) {
                None => Vec::new(),
                Some(Value::Array(items)) => items.iter().map(PathSpec::decode).collect(),
                Some(other) => {
                    return Err(ConfigError::InvalidCopyPaths {
                        key: format!("{SECTION_KEY}.{COPY_PATHS_KEY}"),
                        expected: "a list",
                        found: other.clone(),
                    })
                }
            },
            Some(other) => {
                return Err(ConfigError::InvalidCopyPaths {
                    key: SECTION_KEY.to_string(),
                    expected: "a table",
                    found: other.clone(),
                })
            }
        };

        log::debug!(
            "webroot dir '{}' with {} copy path(s)",
            webroot_dir.display(),
            copy_paths.len()
        );

        Ok(Self {
            webroot_dir,
            copy_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CopyEntry;
    use serde_json::json;

    fn extra(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("extra must be an object"),
        }
    }

    #[test]
    fn test_missing_webroot_dir() {
        let result = Settings::from_extra(&extra(json!({
            "wordpress": { "copy-paths": ["index.php"] }
        })));

        assert!(matches!(result, Err(ConfigError::MissingWebrootDir)));
    }

    #[test]
    fn test_non_string_webroot_dir() {
        let result = Settings::from_extra(&extra(json!({ "webroot-dir": ["public"] })));

        assert!(matches!(result, Err(ConfigError::InvalidWebrootDir { .. })));
    }

    #[test]
    fn test_absolute_webroot_dir() {
        let result = Settings::from_extra(&extra(json!({ "webroot-dir": "/var/www" })));

        assert!(matches!(result, Err(ConfigError::InvalidWebrootDir { .. })));
    }

    #[test]
    fn test_parent_webroot_dir() {
        for dir in ["..", "../..", "public/../../www"] {
            let result = Settings::from_extra(&extra(json!({ "webroot-dir": dir })));

            assert!(matches!(result, Err(ConfigError::InvalidWebrootDir { .. })));
        }
    }

    #[test]
    fn test_copy_paths_default_to_empty() {
        let settings = Settings::from_extra(&extra(json!({ "webroot-dir": "public" }))).unwrap();

        assert_eq!(settings.webroot_dir, PathBuf::from("public"));
        assert!(settings.copy_paths.is_empty());
    }

    #[test]
    fn test_copy_paths_keep_order_and_malformed_entries() {
        let settings = Settings::from_extra(&extra(json!({
            "webroot-dir": "public",
            "wordpress": {
                "copy-paths": [
                    "index.php",
                    ["src/theme", "wp-content/themes/custom"],
                    7,
                    "assets"
                ]
            }
        })))
        .unwrap();

        assert_eq!(
            settings.copy_paths,
            vec![
                PathSpec::Entry(CopyEntry::Single("index.php".into())),
                PathSpec::Entry(CopyEntry::Renamed {
                    source: "src/theme".into(),
                    destination: "wp-content/themes/custom".into(),
                }),
                PathSpec::Unrecognised(json!(7)),
                PathSpec::Entry(CopyEntry::Single("assets".into())),
            ]
        );
    }

    #[test]
    fn test_copy_paths_must_be_a_list() {
        let result = Settings::from_extra(&extra(json!({
            "webroot-dir": "public",
            "wordpress": { "copy-paths": "index.php" }
        })));

        assert!(matches!(result, Err(ConfigError::InvalidCopyPaths { .. })));
    }

    #[test]
    fn test_section_must_be_a_table() {
        let result = Settings::from_extra(&extra(json!({
            "webroot-dir": "public",
            "wordpress": true
        })));

        assert!(matches!(result, Err(ConfigError::InvalidCopyPaths { .. })));
    }
}
