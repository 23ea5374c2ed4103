use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::score::{Leaderboard, Score};

/// Default name of the score file inside the storage directory.
pub const DEFAULT_SCORES_FILE: &str = "scores.txt";

/// Storage failure, with the path that was being touched.
#[derive(Debug)]
pub enum StoreError {
    CreateDir { path: PathBuf, source: io::Error },
    CreateFile { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create storage directory {}: {source}", path.display())
            },
            Self::CreateFile { path, source } => {
                write!(f, "failed to create score file {}: {source}", path.display())
            },
            Self::Write { path, source } => {
                write!(f, "failed to write score file {}: {source}", path.display())
            },
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::CreateFile { source, .. }
            | Self::Write { source, .. } => Some(source),
        }
    }
}

/// Sole owner of the on-disk score file.
///
/// Reads fail soft: an unreadable file loads as an empty leaderboard.
/// Writes fail hard: any error while persisting is returned to the caller.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    dir: PathBuf,
    file: PathBuf,
}

impl ScoreStore {
    /// Store backed by `dir/scores.txt`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_file_name(dir, DEFAULT_SCORES_FILE)
    }

    pub fn with_file_name(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let file = dir.join(file_name);
        Self { dir, file }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the score file.
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Create the storage directory and an empty score file if either is missing.
    pub fn ensure_storage(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        if self.file.exists() {
            return Ok(());
        }
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.file)
        {
            Ok(_) => {
                tracing::info!(path = %self.file.display(), "Created empty score file");
                Ok(())
            },
            // Another request created it between the check and the open.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(StoreError::CreateFile {
                path: self.file.clone(),
                source,
            }),
        }
    }

    /// Current leaderboard as recorded on disk.
    ///
    /// Only storage creation errors are returned. A file that exists but
    /// cannot be read yields an empty leaderboard.
    pub fn load_scores(&self) -> Result<Leaderboard, StoreError> {
        self.ensure_storage()?;
        match fs::read_to_string(&self.file) {
            Ok(text) => Ok(Leaderboard::parse(&text)),
            Err(e) => {
                tracing::warn!(
                    path = %self.file.display(),
                    error = %e,
                    "Failed to read score file, serving empty leaderboard"
                );
                Ok(Leaderboard::new())
            },
        }
    }

    /// Merge `score` into the leaderboard and rewrite the whole file.
    ///
    /// The new contents go to a sibling temp file that is then renamed over
    /// the score file, so readers see either the old or the new board.
    pub fn save_score(&self, score: Score) -> Result<Leaderboard, StoreError> {
        self.ensure_storage()?;
        let top = self.load_scores()?.with_score(score);
        self.replace_file(&top.to_file_text())?;
        Ok(top)
    }

    fn replace_file(&self, contents: &str) -> Result<(), StoreError> {
        let tmp = self.temp_path();
        let result = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, &self.file));
        if let Err(source) = result {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Write {
                path: self.file.clone(),
                source,
            });
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_SCORES_FILE.to_string());
        self.dir.join(format!(".{name}.tmp"))
    }
}
