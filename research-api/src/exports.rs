//! Export directory access
//!
//! Listing and path resolution for the pre-generated export files. A
//! requested name is accepted only if it is a relative path made of normal
//! components and its canonical form stays inside the canonical export root.

use research_common::{Error, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

/// Message returned when the export directory is absent
pub const NO_EXPORTS_DIR: &str = "Exports directory not found";

/// One file of the export directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification, seconds since the Unix epoch
    pub modified: f64,
}

/// List regular files directly inside `root`, sorted by filename
///
/// Directories and symlinks are skipped.
pub async fn list_exports(root: &Path) -> Result<Vec<ExportFile>> {
    ensure_directory(root).await?;

    let mut entries = tokio::fs::read_dir(root).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if !file_type.is_file() {
            continue;
        }

        // Files removed between read_dir and stat are simply left out
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Export vanished while listing: {:?}", entry.file_name());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        files.push(ExportFile {
            filename: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            modified: modified_seconds(&metadata),
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}

/// Lexically validate a requested export name
///
/// Rejects empty names, NUL bytes, backslashes, absolute paths and any `..`
/// component. Returns the name as a relative path.
pub fn validate_export_name(name: &str) -> Result<PathBuf> {
    let invalid = || Error::InvalidInput(format!("Invalid export filename: {}", name));

    if name.is_empty() || name.contains('\0') || name.contains('\\') {
        return Err(invalid());
    }

    let mut relative = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid());
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(relative)
}

/// Resolve `name` to a regular file inside `root`
///
/// The returned path is canonical and guaranteed to start with the
/// canonical export root.
pub async fn resolve_export(root: &Path, name: &str) -> Result<PathBuf> {
    let relative = validate_export_name(name)?;
    ensure_directory(root).await?;

    let canonical_root = tokio::fs::canonicalize(root).await?;
    let missing = || Error::NotFound(format!("Export file not found: {}", name));

    let candidate = match tokio::fs::canonicalize(canonical_root.join(&relative)).await {
        Ok(path) => path,
        Err(e) => {
            debug!("Export {} not resolvable: {}", name, e);
            return Err(missing());
        }
    };

    if !candidate.starts_with(&canonical_root) {
        warn!(
            "Rejected export {} resolving outside {}",
            name,
            canonical_root.display()
        );
        return Err(Error::InvalidInput(format!("Invalid export filename: {}", name)));
    }

    let metadata = tokio::fs::metadata(&candidate).await.map_err(|_| missing())?;
    if !metadata.is_file() {
        return Err(missing());
    }

    Ok(candidate)
}

async fn ensure_directory(root: &Path) -> Result<()> {
    match tokio::fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotFound(NO_EXPORTS_DIR.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::NotFound(NO_EXPORTS_DIR.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn modified_seconds(metadata: &std::fs::Metadata) -> f64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
