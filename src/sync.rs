use crate::{
    config::ValidationError,
    entry::{CopyEntry, PathSpec},
    errors::IoError,
    fsops,
    root::ProjectRoot,
};
use miette::Diagnostic;
use std::{
    fmt,
    io::Write,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SyncError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("source path does not exist: '{path}'")]
    #[diagnostic(
        code(webroot_sync::sync::missing_source),
        help("Create the path or remove it from copy-paths")
    )]
    MissingSource { path: PathBuf },

    #[error("source '{from}' and destination '{to}' overlap")]
    #[diagnostic(
        code(webroot_sync::sync::overlapping_paths),
        help("A destination may not contain, or live inside, its own source")
    )]
    OverlappingPaths { from: PathBuf, to: PathBuf },

    #[error("I/O error within sync domain")]
    #[diagnostic(code(webroot_sync::sync::io))]
    Io(#[from] IoError),
}

/// How a destination is produced from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPolicy {
    /// Symlink in dev mode, real copies otherwise.
    #[default]
    ModeDependent,
    AlwaysSymlink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Symlink,
    CopyFile,
    Mirror,
}
impl Method {
    fn as_str(&self) -> &str {
        match self {
            Self::Symlink => "link",
            Self::CopyFile => "copy",
            Self::Mirror => "mirror",
        }
    }
}
impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a synchronization run needs, built once by the caller.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub project_root: ProjectRoot,
    pub webroot_dir: PathBuf,
    pub dev_mode: bool,
    pub policy: LinkPolicy,
    /// Gates the `Moved <from> to <to>` lines written to the output sink.
    pub verbose: bool,
}
impl SyncContext {
    pub fn new(project_root: ProjectRoot, webroot_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_root,
            webroot_dir: webroot_dir.into(),
            dev_mode: true,
            policy: LinkPolicy::default(),
            verbose: false,
        }
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_policy(mut self, policy: LinkPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn webroot(&self) -> PathBuf {
        self.project_root.path().join(&self.webroot_dir)
    }

    pub fn source_path(&self, entry: &CopyEntry) -> PathBuf {
        self.project_root.path().join(entry.source())
    }

    pub fn destination_path(&self, entry: &CopyEntry) -> PathBuf {
        self.webroot().join(entry.destination())
    }

    fn should_symlink(&self) -> bool {
        match self.policy {
            LinkPolicy::AlwaysSymlink => true,
            LinkPolicy::ModeDependent => self.dev_mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub from: PathBuf,
    pub to: PathBuf,
    pub method: Method,
}

/// Entries applied by a run, in the order they were applied.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub applied: Vec<Applied>,
}

/// Applies every copy path in listed order and stops at the first failure.
///
/// Entries applied before a failure are left in place. When `ctx.verbose` is
/// set, one `Moved <from> to <to>` line per entry is written to `out`; write
/// failures on `out` are ignored.
///
/// # Errors
///
/// Returns a [`SyncError`] if:
///
/// - A copy path has an unrecognised shape.
/// - A source path does not exist, or overlaps its destination.
/// - Removing, linking or copying fails.
pub fn synchronize<W: Write>(
    ctx: &SyncContext,
    specs: &[PathSpec],
    out: &mut W,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    for spec in specs {
        let entry = match spec {
            PathSpec::Entry(entry) => entry,
            PathSpec::Unrecognised(value) => Err(ValidationError::UnrecognisedPathFormat {
                value: value.clone(),
            })?,
        };

        report.applied.push(sync_entry(ctx, entry, out)?);
    }

    Ok(report)
}

/// Replaces the destination of a single entry with a link to, or a copy of,
/// its source.
pub fn sync_entry<W: Write>(
    ctx: &SyncContext,
    entry: &CopyEntry,
    out: &mut W,
) -> Result<Applied, SyncError> {
    let from = ctx.source_path(entry);
    let to = ctx.destination_path(entry);

    if !from.exists() {
        return Err(SyncError::MissingSource { path: from });
    }

    if overlaps(&from, &to) {
        return Err(SyncError::OverlappingPaths { from, to });
    }

    if fsops::exists(&to) {
        fsops::remove(&to)?;
    }

    let method = if ctx.should_symlink() {
        fsops::symlink(&from, &to)?;
        Method::Symlink
    } else if from.is_file() {
        fsops::copy_file(&from, &to)?;
        Method::CopyFile
    } else {
        fsops::mirror(&from, &to)?;
        Method::Mirror
    };

    log::debug!("{} {} -> {}", method, from.display(), to.display());

    if ctx.verbose {
        let _ = writeln!(out, "Moved {} to {}", from.display(), to.display());
    }

    Ok(Applied { from, to, method })
}

fn overlaps(from: &Path, to: &Path) -> bool {
    let (from, to) = (normalize(from), normalize(to));

    from.starts_with(&to) || to.starts_with(&from)
}

// Lexical only: resolves "." and ".." without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
