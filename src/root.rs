use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RootError {
    #[error("I/O error within project root domain")]
    #[diagnostic(
        code(webroot_sync::root::io),
        help("The directory containing the vendor dir must exist")
    )]
    Io(#[from] IoError),

    #[error("vendor dir '{path}' has no parent directory")]
    #[diagnostic(code(webroot_sync::root::no_parent))]
    NoParent { path: PathBuf },
}

/// Absolute, canonical project root. Every source and destination path is
/// resolved against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot(PathBuf);
impl ProjectRoot {
    /// The project root is the parent of the vendor dir. The vendor dir itself
    /// may not exist yet, so only its parent is canonicalized.
    pub fn from_vendor_dir<P: AsRef<Path>>(vendor_dir: P) -> Result<Self, RootError> {
        let vendor_dir = vendor_dir.as_ref();

        let parent = match vendor_dir.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => {
                return Err(RootError::NoParent {
                    path: vendor_dir.to_path_buf(),
                })
            }
        };

        let canonical = dunce::canonicalize(parent)
            .map_err(|error| IoError::new(FileOperation::Canonicalize, parent.into(), error))?;

        log::debug!("resolved project root: {}", canonical.display());

        Ok(Self(canonical))
    }

    /// Resolves `vendor_dir` against `base` when it is relative.
    pub fn resolve<P: AsRef<Path>>(base: P, vendor_dir: &str) -> Result<Self, RootError> {
        Self::from_vendor_dir(base.as_ref().join(vendor_dir))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
impl AsRef<Path> for ProjectRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_parent_of_missing_vendor_dir() {
        let dir = tempfile::tempdir().unwrap();

        let root = ProjectRoot::resolve(dir.path(), "vendor").unwrap();

        assert_eq!(root.path(), dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_nested_vendor_dir_moves_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();

        let root = ProjectRoot::resolve(dir.path(), "lib/vendor").unwrap();

        assert_eq!(
            root.path(),
            dunce::canonicalize(dir.path().join("lib")).unwrap()
        );
    }

    #[test]
    fn test_root_is_absolute_for_relative_vendor_dir() {
        let root = ProjectRoot::from_vendor_dir("vendor").unwrap();

        assert!(root.path().is_absolute());
    }

    #[test]
    fn test_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();

        let result = ProjectRoot::resolve(dir.path(), "missing/vendor");

        assert!(matches!(result, Err(RootError::Io(_))));
    }
}
