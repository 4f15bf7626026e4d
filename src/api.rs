use crate::{
    config::{ConfigError, Settings},
    hooks::{self, HookEvent, Listener},
    manifest::{Manifest, ManifestError},
    root::{ProjectRoot, RootError},
    sync::{self, LinkPolicy, SyncContext, SyncError, SyncReport},
};
use std::{io::Write, path::PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum WebrootError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Root(#[from] RootError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sync(#[from] SyncError),
}

/// Invocation settings supplied by the host tool (flags and environment).
#[derive(Debug, Clone)]
pub struct Options {
    pub project_dir: PathBuf,
    /// Manifest path, relative to `project_dir` unless absolute. Discovered
    /// when `None`.
    pub manifest: Option<PathBuf>,
    /// Overrides the manifest's `config.vendor-dir`.
    pub vendor_dir: Option<String>,
    pub dev_mode: bool,
    pub policy: LinkPolicy,
    pub verbose: bool,
}
impl Options {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            manifest: None,
            vendor_dir: None,
            dev_mode: true,
            policy: LinkPolicy::default(),
            verbose: false,
        }
    }
}

/// Loads the manifest, resolves configuration and the project root, and
/// builds the [`SyncContext`] for a run.
///
/// Nothing on disk is modified.
pub fn load(options: &Options) -> Result<(SyncContext, Settings), WebrootError> {
    let manifest = match &options.manifest {
        Some(path) => Manifest::from_file(options.project_dir.join(path))?,
        None => Manifest::discover(&options.project_dir)?,
    };

    let settings = Settings::from_extra(&manifest.extra)?;

    let vendor_dir = options
        .vendor_dir
        .as_deref()
        .unwrap_or_else(|| manifest.vendor_dir());

    let project_root = ProjectRoot::resolve(manifest.dir(), vendor_dir)?;

    let ctx = SyncContext::new(project_root, settings.webroot_dir.clone())
        .with_dev_mode(options.dev_mode)
        .with_policy(options.policy)
        .with_verbose(options.verbose);

    Ok((ctx, settings))
}

/// Synchronizes every configured copy path into the webroot.
///
/// # Errors
///
/// Returns a [`WebrootError`] if:
///
/// - The manifest cannot be found, read or parsed.
/// - `webroot-dir` is missing or `copy-paths` is malformed.
/// - The project root cannot be resolved.
/// - Any entry fails to synchronize. Earlier entries stay applied.
pub fn initialise_webroot<W: Write>(
    options: &Options,
    out: &mut W,
) -> Result<SyncReport, WebrootError> {
    let (ctx, settings) = load(options)?;

    log::info!(
        "synchronizing {} path(s) into {} ({})",
        settings.copy_paths.len(),
        ctx.webroot().display(),
        if ctx.dev_mode { "dev" } else { "no-dev" }
    );

    let report = sync::synchronize(&ctx, &settings.copy_paths, out)?;

    Ok(report)
}

/// Runs every listener subscribed to `event`, in priority order.
pub fn run_hook<W: Write>(
    event: HookEvent,
    options: &Options,
    out: &mut W,
) -> Result<Vec<SyncReport>, WebrootError> {
    log::debug!("dispatching {}", event);

    hooks::listeners_for(event)
        .into_iter()
        .map(|subscription| match subscription.listener {
            Listener::InitialiseWebroot => initialise_webroot(options, out),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_project(manifest: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("composer.json"), manifest).unwrap();
        fs::write(dir.path().join("index.php"), "<?php").unwrap();
        dir
    }

    #[test]
    fn test_missing_webroot_dir_touches_nothing() {
        let dir = write_project(r#"{"extra": {"wordpress": {"copy-paths": ["index.php"]}}}"#);
        let before: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();

        let result = initialise_webroot(&Options::new(dir.path()), &mut Vec::new());

        assert!(matches!(
            result,
            Err(WebrootError::Config(ConfigError::MissingWebrootDir))
        ));
        let after: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(before.len(), after.len());
    }

    #[test]
    fn test_public_index_php_is_created() {
        let dir = write_project(
            r#"{"extra": {"webroot-dir": "public", "wordpress": {"copy-paths": ["index.php"]}}}"#,
        );
        let mut options = Options::new(dir.path());
        options.dev_mode = false;

        let report = initialise_webroot(&options, &mut Vec::new()).unwrap();

        assert_eq!(report.applied.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("public/index.php")).unwrap(),
            "<?php"
        );
    }

    #[test]
    fn test_vendor_dir_override_moves_project_root() {
        let dir = write_project(
            r#"{"extra": {"webroot-dir": "public", "wordpress": {"copy-paths": ["index.php"]}}}"#,
        );
        fs::create_dir(dir.path().join("app")).unwrap();
        let mut options = Options::new(dir.path());
        options.vendor_dir = Some("app/vendor".to_string());

        let (ctx, _) = load(&options).unwrap();

        assert_eq!(
            ctx.project_root.path(),
            dunce::canonicalize(dir.path().join("app")).unwrap()
        );
    }

    #[test]
    fn test_hook_runs_initialise_once() {
        let dir = write_project(r#"{"extra": {"webroot-dir": "public"}}"#);

        let reports = run_hook(
            HookEvent::PostInstallCmd,
            &Options::new(dir.path()),
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].applied.is_empty());
    }
}
