use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead as _, BufReader, ErrorKind, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use pictile_engine::ScoreRecord;

pub const DEFAULT_SCORES_FILE: &str = "./data/scores.jsonl";

/// Append-only score list, one JSON record per line.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ScoreRecord) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open score file: {}", self.path.display()))?;
        let mut line = serde_json::to_string(record).context("Failed to serialize score")?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to write score file: {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "score saved");
        Ok(())
    }

    /// Reads every stored record in file order. A missing file is an empty list.
    pub fn read_all(&self) -> anyhow::Result<Vec<ScoreRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open score file: {}", self.path.display())
                });
            }
        };

        let mut records = vec![];
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read score file: {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse score at {}:{}",
                    self.path.display(),
                    i + 1
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use pictile_engine::{ElapsedTime, GridSize};

    use super::*;

    fn record(moves: usize, secs: u64) -> ScoreRecord {
        ScoreRecord {
            grid_size: GridSize::new(3).unwrap(),
            move_count: moves,
            elapsed: ElapsedTime::from_secs(secs),
            recorded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_order_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("nested/data/scores.jsonl"));
        store.append(&record(12, 40)).unwrap();
        store.append(&record(7, 95)).unwrap();

        let records = store.read_all().unwrap();
        assert_eq!(records, vec![record(12, 40), record(7, 95)]);
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.jsonl");
        let store = ScoreStore::new(path.clone());
        store.append(&record(5, 5)).unwrap();
        fs::write(
            &path,
            format!("{}\nnot json\n", fs::read_to_string(&path).unwrap().trim()),
        )
        .unwrap();

        let err = store.read_all().unwrap_err();
        assert!(format!("{err}").ends_with(":2"), "{err}");
    }

    #[test]
    fn test_out_of_range_time_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.jsonl");
        let store = ScoreStore::new(path.clone());
        store.append(&record(5, 5)).unwrap();
        let stored = fs::read_to_string(&path).unwrap();
        let corrupt = stored.replace("\"00:05\"", "\"307445734561825861:00\"");
        assert_ne!(corrupt, stored);
        fs::write(&path, format!("{stored}{corrupt}")).unwrap();

        let err = store.read_all().unwrap_err();
        assert!(format!("{err}").ends_with(":2"), "{err}");
    }
}
