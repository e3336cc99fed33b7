//! Append-only JSONL store of changes, used as an undo or redo stack.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ChangeError, NerChange};

/// A stack of `NerChange` records, one JSON object per line, newest last.
#[derive(Debug, Clone)]
pub struct ChangeLog {
    path: PathBuf,
}

impl ChangeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record, oldest first. A missing file is an empty log.
    pub fn entries(&self) -> Result<Vec<NerChange>, ChangeError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        fs::read_to_string(&self.path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(NerChange::from_json_line)
            .collect()
    }

    pub fn len(&self) -> Result<usize, ChangeError> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ChangeError> {
        Ok(self.len()? == 0)
    }

    pub fn push(&self, change: &NerChange) -> Result<(), ChangeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", change.to_json_line()?)?;
        debug!("Recorded change in {}", self.path.display());
        Ok(())
    }

    /// Remove and return the newest record.
    pub fn pop(&self) -> Result<Option<NerChange>, ChangeError> {
        let mut entries = self.entries()?;
        let Some(last) = entries.pop() else {
            return Ok(None);
        };
        self.write_all(&entries)?;
        Ok(Some(last))
    }

    pub fn clear(&self) -> Result<(), ChangeError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn write_all(&self, entries: &[NerChange]) -> Result<(), ChangeError> {
        let mut content = String::new();
        for entry in entries {
            content.push_str(&entry.to_json_line()?);
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionResult;

    fn change(column: usize) -> NerChange {
        NerChange::new(
            column,
            vec!["dummy".to_string()],
            vec![vec![ExtractionResult::failed("offline")]],
        )
    }

    #[test]
    fn test_push_and_pop_are_lifo() {
        let dir = tempfile::tempdir().unwrap();
        let log = ChangeLog::new(dir.path().join("table.history.jsonl"));
        assert!(log.is_empty().unwrap());

        log.push(&change(1)).unwrap();
        log.push(&change(2)).unwrap();
        assert_eq!(log.len().unwrap(), 2);

        assert_eq!(log.pop().unwrap().unwrap().column_index(), 2);
        assert_eq!(log.pop().unwrap().unwrap().column_index(), 1);
        assert!(log.pop().unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = ChangeLog::new(dir.path().join("nested").join("t.redo.jsonl"));
        log.push(&change(0)).unwrap();
        assert!(log.path().exists());

        log.clear().unwrap();
        assert!(!log.path().exists());
        assert!(log.is_empty().unwrap());
    }
}
