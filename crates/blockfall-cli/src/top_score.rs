use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_SCORE_FILE: &str = "./data/top_score.json";

/// Contents of the top-score file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopScoreRecord {
    pub top_score: usize,
    pub recorded_at: DateTime<Utc>,
}

impl TopScoreRecord {
    pub fn now(top_score: usize) -> Self {
        Self {
            top_score,
            recorded_at: Utc::now(),
        }
    }
}

/// JSON file holding the best score across sessions.
#[derive(Debug, Clone)]
pub struct TopScoreStore {
    path: PathBuf,
}

impl TopScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved record. A missing file means nothing was saved yet.
    pub fn load(&self) -> anyhow::Result<Option<TopScoreRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open top score file: {}", self.path.display())
                });
            }
        };
        let reader = BufReader::new(file);
        let record = serde_json::from_reader(reader).with_context(|| {
            format!("Failed to parse top score file: {}", self.path.display())
        })?;
        Ok(Some(record))
    }

    /// Returns the saved top score, or 0 if there is none.
    pub fn load_score(&self) -> anyhow::Result<usize> {
        Ok(self.load()?.map_or(0, |record| record.top_score))
    }

    pub fn save(&self, record: &TopScoreRecord) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create file: {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)
            .with_context(|| format!("Failed to write JSON to {}", self.path.display()))?;
        writeln!(writer)
            .with_context(|| format!("Failed to write JSON to {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        Ok(())
    }

    /// Deletes the saved record. Returns `false` if there was none.
    pub fn clear(&self) -> anyhow::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove file: {}", self.path.display())),
        }
    }
}
