//! Uploaded-batch loading: single messages and ZIP archives of messages.
//!
//! Per-message failures are contained (the batch proceeds without the
//! message); only unreadable inputs propagate as errors.

use std::fs;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use mealwrap_core::EmailEntry;
use tracing::warn;
use zip::ZipArchive;

/// Upper bound on a single decompressed archive entry (zip-bomb protection).
const MAX_ENTRY_BYTES: u64 = 20 * 1024 * 1024;

/// Read a batch of files from disk, preserving order.
pub fn load_uploads(paths: &[PathBuf]) -> Result<Vec<EmailEntry>> {
    let mut entries = Vec::new();
    for path in paths {
        let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        ingest_upload(&filename, &raw, &mut entries)?;
    }
    Ok(entries)
}

/// Ingest one uploaded item by extension: `.zip` archives are walked for
/// contained messages, `.eml` files are parsed directly, anything else is
/// skipped with a warning.
pub fn ingest_upload(filename: &str, bytes: &[u8], out: &mut Vec<EmailEntry>) -> Result<()> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".zip") {
        ingest_zip(filename, bytes, out)
    } else if lower.ends_with(".eml") {
        if let Some(entry) = crate::message::parse_eml(bytes, filename) {
            out.push(entry);
        }
        Ok(())
    } else {
        warn!("skipping unsupported upload: {filename}");
        Ok(())
    }
}

fn ingest_zip(filename: &str, bytes: &[u8], out: &mut Vec<EmailEntry>) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .with_context(|| format!("opening archive {filename}"))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("reading entry {i} of {filename}"))?;
        if !entry.is_file() {
            continue;
        }

        let entry_path = entry.name().to_string();
        let entry_name = entry_path.rsplit('/').next().unwrap_or(&entry_path);
        if !entry_name.to_lowercase().ends_with(".eml") {
            warn!("skipping unsupported archive entry: {entry_path}");
            continue;
        }

        let mut raw = Vec::new();
        entry
            .by_ref()
            .take(MAX_ENTRY_BYTES)
            .read_to_end(&mut raw)
            .with_context(|| format!("decompressing {entry_path}"))?;
        if raw.len() as u64 >= MAX_ENTRY_BYTES {
            warn!("skipping oversized archive entry: {entry_path}");
            continue;
        }

        if let Some(parsed) = crate::message::parse_eml(&raw, entry_name) {
            out.push(parsed);
        }
    }
    Ok(())
}
