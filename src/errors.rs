use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("inspecting a path")]
    Stat,
    #[error("resolving a canonical path")]
    Canonicalize,
    #[error("creating a directory")]
    Mkdir,
    #[error("removing a path")]
    Remove,
    #[error("creating a symlink")]
    Symlink,
    #[error("copying a file")]
    Copy,
    #[error("mirroring a directory")]
    Mirror,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(webroot_sync::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum FileFormat {
    #[error("json")]
    Json,
    #[error("toml")]
    Toml,
}
#[derive(Debug, Error, Diagnostic)]
pub enum ParseSource {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
#[derive(Debug, Error, Diagnostic)]
#[error("Parsing error: {file_format} on '{path}'")]
#[diagnostic(code(webroot_sync::parse), help("Review file"))]
pub struct ParseError {
    pub file_format: FileFormat,
    pub path: PathBuf,
    #[source]
    pub source: ParseSource,
}
impl ParseError {
    pub fn new(file_format: FileFormat, path: PathBuf, error: impl Into<ParseSource>) -> Self {
        Self {
            file_format,
            path,
            source: error.into(),
        }
    }
}
