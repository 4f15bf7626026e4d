//! Filesystem primitives used by the synchronizer.
//!
//! Each primitive maps its failure into an [`IoError`] naming the operation and
//! the path it was working on.

use crate::errors::{FileOperation, IoError};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// True when anything sits at `path`, dangling symlinks included.
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Removes whatever sits at `path`. Symlinks are unlinked, never followed;
/// directories are removed recursively. A missing path is not an error.
pub fn remove(path: &Path) -> Result<(), IoError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(IoError::new(FileOperation::Stat, path.into(), error)),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else if is_dir_link(&metadata) {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };

    result.map_err(|error| IoError::new(FileOperation::Remove, path.into(), error))?;

    log::debug!("removed {}", path.display());

    Ok(())
}

/// Creates a symlink at `link` pointing to `original`, creating the parent
/// directories of `link` first.
pub fn symlink(original: &Path, link: &Path) -> Result<(), IoError> {
    create_parent(link)?;

    platform_symlink(original, link)
        .map_err(|error| IoError::new(FileOperation::Symlink, link.into(), error))?;

    log::debug!("linked {} -> {}", link.display(), original.display());

    Ok(())
}

/// Copies a single file, creating the parent directories of `to` first.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), IoError> {
    create_parent(to)?;

    fs::copy(from, to).map_err(|error| IoError::new(FileOperation::Copy, to.into(), error))?;

    log::debug!("copied {} -> {}", from.display(), to.display());

    Ok(())
}

/// Recursively copies the directory `from` to `to`. Symlinks found inside the
/// tree are recreated as symlinks with the same target.
pub fn mirror(from: &Path, to: &Path) -> Result<(), IoError> {
    create_dir(to)?;

    for entry in WalkDir::new(from).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error.path().unwrap_or(from).to_path_buf();

                Err(IoError::new(FileOperation::Mirror, path, error.into()))?
            }
        };

        let relative = entry.path().strip_prefix(from).map_err(|error| {
            IoError::new(
                FileOperation::Mirror,
                entry.path().to_path_buf(),
                io::Error::other(error),
            )
        })?;

        let target = to.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            create_dir(&target)?;
        } else if file_type.is_symlink() {
            let link_target = fs::read_link(entry.path()).map_err(|error| {
                IoError::new(FileOperation::Read, entry.path().to_path_buf(), error)
            })?;

            platform_symlink(&link_target, &target)
                .map_err(|error| IoError::new(FileOperation::Symlink, target.clone(), error))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(|error| IoError::new(FileOperation::Copy, target.clone(), error))?;
        }
    }

    log::debug!("mirrored {} -> {}", from.display(), to.display());

    Ok(())
}

fn create_dir(path: &Path) -> Result<(), IoError> {
    fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, PathBuf::from(path), error))
}

fn create_parent(path: &Path) -> Result<(), IoError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn platform_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn platform_symlink(original: &Path, link: &Path) -> io::Result<()> {
    if original.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}

#[cfg(windows)]
fn is_dir_link(metadata: &fs::Metadata) -> bool {
    use std::os::windows::fs::FileTypeExt;

    metadata.file_type().is_symlink_dir()
}

#[cfg(not(windows))]
fn is_dir_link(_metadata: &fs::Metadata) -> bool {
    false
}
