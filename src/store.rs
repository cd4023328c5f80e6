//! Rendered report storage: listing and download lookup.
//!
//! The reports directory is the only index. Nothing is cached; each call
//! scans or stats the filesystem.

use crate::error::ReportError;
use crate::output::{self, ArtifactInfo};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plain `*.pdf` file names: no separators, no leading dot.
static RE_ARTIFACT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-][A-Za-z0-9_.\-]*\.pdf$").unwrap());

/// True if `filename` may be served from the reports directory.
pub fn is_valid_artifact_name(filename: &str) -> bool {
    RE_ARTIFACT_NAME.is_match(filename) && !filename.contains("..")
}

/// Every `*.pdf` file in `dir`, newest file name first.
///
/// A missing directory is an empty listing, not an error.
pub fn list_artifacts(dir: &Path, download_base: &str) -> Result<Vec<ArtifactInfo>, ReportError> {
    let storage = |source: std::io::Error| ReportError::Storage {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Reports directory {} does not exist yet", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(storage(e)),
    };

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(storage)?;
        let Ok(filename) = entry.file_name().into_string() else {
            continue;
        };
        if !filename.ends_with(".pdf") {
            continue;
        }
        let meta = entry.metadata().map_err(storage)?;
        if !meta.is_file() {
            continue;
        }
        let created = meta.created().or_else(|_| meta.modified()).map_err(storage)?;

        artifacts.push(ArtifactInfo {
            download_url: output::download_url(download_base, &filename),
            filename,
            size: meta.len(),
            created_at: DateTime::<Utc>::from(created),
        });
    }

    artifacts.sort_by(|a, b| b.filename.cmp(&a.filename));
    Ok(artifacts)
}

/// Path of a stored report, after validating the requested name.
///
/// # Errors
/// [`ReportError::ArtifactNotFound`] if the name is not a plain `*.pdf` file
/// name or no such file exists.
pub fn resolve_artifact(dir: &Path, filename: &str) -> Result<PathBuf, ReportError> {
    let not_found = || ReportError::ArtifactNotFound {
        filename: filename.to_string(),
    };
    if !is_valid_artifact_name(filename) {
        debug!("Rejected artifact name {:?}", filename);
        return Err(not_found());
    }
    let path = dir.join(filename);
    if path.is_file() {
        Ok(path)
    } else {
        Err(not_found())
    }
}

/// Contents of a stored report.
pub fn read_artifact(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportError> {
    let path = resolve_artifact(dir, filename)?;
    fs::read(&path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ReportError::ArtifactNotFound {
            filename: filename.to_string(),
        },
        _ => ReportError::Storage { path, source },
    })
}
