use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default results root, relative to the working directory
pub const DEFAULT_RESULTS_DIR: &str = "wyniki";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes brochures to `<root>/<YYYY-MM-DD>/<name>.md`
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory brochures written on `date` go to
    pub fn dated_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.format("%Y-%m-%d").to_string())
    }

    /// Save under today's (local) date
    pub fn save(&self, filename: &str, content: &str) -> Result<PathBuf, OutputError> {
        self.save_on(Local::now().date_naive(), filename, content)
    }

    /// Save under the directory for `date`, overwriting any existing file.
    ///
    /// `.md` is appended to `filename` unless already present.
    pub fn save_on(
        &self,
        date: NaiveDate,
        filename: &str,
        content: &str,
    ) -> Result<PathBuf, OutputError> {
        let dir = self.dated_dir(date);
        fs::create_dir_all(&dir).map_err(|source| OutputError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = if filename.ends_with(".md") {
            dir.join(filename)
        } else {
            dir.join(format!("{}.md", filename))
        };

        fs::write(&path, content).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        ::log::info!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }
}
