use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use texlive_logging::{texlive_debug, texlive_info};
use thiserror::Error;

use crate::artifact_filename;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), DownloadError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| DownloadError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(DownloadError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| DownloadError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// A PDF staged next to its destination.
///
/// The staging file is the transient handle for one save: it exists from
/// receipt of the artifact until `save_as` hands it to its final name, and
/// is removed on drop on every other path.
pub struct StagedArtifact {
    file: NamedTempFile,
}

impl StagedArtifact {
    pub fn acquire(dir: &Path, pdf: &[u8]) -> Result<Self, DownloadError> {
        let mut file = tempfile::Builder::new()
            .prefix(".texlive-")
            .suffix(".part")
            .tempfile_in(dir)?;
        file.write_all(pdf)?;
        file.flush()?;
        file.as_file_mut().sync_all()?;
        texlive_debug!("Staged {} bytes at {:?}", pdf.len(), file.path());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Moves the staged bytes to `target`, replacing any existing file.
    pub fn save_as(self, target: &Path) -> Result<PathBuf, DownloadError> {
        // Rename replaces an existing target atomically.
        // On failure the returned handle is dropped here, which deletes the staging file.
        self.file
            .persist(target)
            .map_err(|e| DownloadError::Io(e.error))?;
        Ok(target.to_path_buf())
    }
}

/// Saves compiled PDFs under a fixed output directory.
#[derive(Debug, Clone)]
pub struct ArtifactDownloader {
    dir: PathBuf,
}

impl ArtifactDownloader {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `pdf` as `{archive stem}.pdf` and returns the saved path.
    pub fn download(&self, pdf: &[u8], archive_name: &str) -> Result<PathBuf, DownloadError> {
        ensure_output_dir(&self.dir)?;
        let target = self.dir.join(artifact_filename(archive_name));
        let staged = StagedArtifact::acquire(&self.dir, pdf)?;
        let saved = staged.save_as(&target)?;
        texlive_info!("Saved {} bytes to {:?}", pdf.len(), saved);
        Ok(saved)
    }
}
