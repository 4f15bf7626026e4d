use crate::errors::{FileFormat, FileOperation, IoError, ParseError};
use miette::Diagnostic;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Manifest file names probed by [`Manifest::discover`], in order.
pub const MANIFEST_CANDIDATES: [&str; 2] = ["composer.json", "webroot.toml"];

const DEFAULT_VENDOR_DIR: &str = "vendor";

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("I/O error within manifest domain")]
    #[diagnostic(code(webroot_sync::manifest::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("no manifest found in '{dir}'")]
    #[diagnostic(
        code(webroot_sync::manifest::not_found),
        help("Create a composer.json or webroot.toml, or pass --manifest")
    )]
    NotFound { dir: PathBuf },
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ManifestConfig {
    #[serde(rename = "vendor-dir")]
    pub vendor_dir: Option<String>,
}

/// The subset of package metadata the synchronizer cares about.
///
/// Everything else in the file (dependencies, scripts, autoload rules) is
/// ignored.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Manifest {
    /// Arbitrary project metadata. `webroot-dir` and `wordpress.copy-paths`
    /// live here.
    #[serde(default)]
    pub extra: Map<String, Value>,
    #[serde(default)]
    pub config: ManifestConfig,
    #[serde(skip)]
    pub path: PathBuf,
}
impl Manifest {
    /// Reads a manifest, picking the parser from the file extension. Anything
    /// that is not `.toml` is treated as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let mut manifest = if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
                .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?
        } else {
            Self::from_json_str(&content)
                .map_err(|error| ParseError::new(FileFormat::Json, path.to_path_buf(), error))?
        };

        manifest.path = path.to_path_buf();

        log::debug!("loaded manifest from {}", path.display());

        Ok(manifest)
    }

    /// Looks for one of [`MANIFEST_CANDIDATES`] inside `dir`.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, ManifestError> {
        let dir = dir.as_ref();

        MANIFEST_CANDIDATES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ManifestError::NotFound {
                dir: dir.to_path_buf(),
            })
            .and_then(Self::from_file)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Directory holding the manifest; relative vendor dirs resolve against it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn vendor_dir(&self) -> &str {
        self.config
            .vendor_dir
            .as_deref()
            .unwrap_or(DEFAULT_VENDOR_DIR)
    }
}
