//! Writing the Aggregate to Disk
//!
//! The final stage of a file-mode run. The aggregate is rendered in the format
//! implied by the destination path (JSON for `.json`, YAML otherwise), written
//! to a hidden sibling temporary file, and renamed over the destination. The
//! rename keeps the write all-or-nothing: a reader sees either the previous
//! document or the complete new one.
//!
//! This module also loads the previous output for change detection.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::schema::{OutputFormat, SchemaDocument};
use crate::version::SchemaVersion;

/// Renders `document` and writes it atomically to `path`.
pub fn write_document(document: &SchemaDocument, path: &Path) -> Result<()> {
    let rendered = document.encode(OutputFormat::from_path(path))?;
    write_atomic(path, rendered.as_bytes())
}

/// Writes `content` to `path` through a temporary sibling and a rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let write_error = |e: std::io::Error| Error::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let temp_path = temp_path_for(path);
    debug!("Writing {} via {}", path.display(), temp_path.display());

    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_error(e));
    }
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        write_error(e)
    })
}

/// Loads the document previously written to `path`, if there is one.
///
/// Returns `Ok(None)` when nothing exists at `path`. Decoding errors are
/// returned to the caller, which decides how to treat an unreadable previous
/// output.
pub fn read_existing(path: &Path, version: SchemaVersion) -> Result<Option<SchemaDocument>> {
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    let document = SchemaDocument::decode(version, &bytes, &path.display().to_string())?;
    Ok(Some(document))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "component-definition".to_string());
    path.with_file_name(format!(".{file_name}.tmp"))
}
