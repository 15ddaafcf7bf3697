//! Atomic artifact writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use specgen_shared::{Result, SpecgenError};

use crate::ArtifactKind;

/// Metadata for a single written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

impl ArtifactMeta {
    pub(crate) fn new(kind: ArtifactKind, path: PathBuf, content: &[u8]) -> Self {
        Self {
            kind,
            path,
            sha256: sha256_hex(content),
            size_bytes: content.len(),
        }
    }
}

pub(crate) fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Write `content` to `path` through a temp file in the same directory.
///
/// The temp file is named `.<file>.<uuid>.tmp`, flushed, synced and renamed
/// over the target. Readers see either the previous file or the complete new
/// one. On failure the temp file is removed; where the filesystem cannot
/// rename atomically a crash may leave it behind, never a truncated target.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SpecgenError::config(format!("invalid artifact path: {}", path.display())))?;
    let temp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::now_v7()));

    let result = write_temp(&temp, content)
        .and_then(|()| fs::rename(&temp, path).map_err(|e| SpecgenError::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_temp(temp: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(temp).map_err(|e| SpecgenError::io(temp, e))?;
    file.write_all(content).map_err(|e| SpecgenError::io(temp, e))?;
    file.flush().map_err(|e| SpecgenError::io(temp, e))?;
    file.sync_all().map_err(|e| SpecgenError::io(temp, e))
}
