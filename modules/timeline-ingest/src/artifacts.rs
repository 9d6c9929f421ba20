use std::path::{Path, PathBuf};

use timeline_common::{ChartLayout, Event, FilterCatalog, IngestResult};
use tracing::{info, warn};

pub const EVENTS_FILE: &str = "events.json";
pub const FILTERS_FILE: &str = "filters.json";
pub const CHART_FILE: &str = "chart.json";

/// The three outputs of an ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub events: Vec<Event>,
    pub filters: FilterCatalog,
    pub chart: ChartLayout,
}

impl Artifacts {
    /// Write all artifacts into `dir`, all three or none.
    ///
    /// Everything is serialized before the first file is touched, and each
    /// file is staged under a temporary name then renamed into place. If a
    /// rename fails, files already swapped in are restored to their previous
    /// contents and every staged file is removed.
    pub fn write_all(&self, dir: &Path) -> IngestResult<Vec<PathBuf>> {
        let rendered = [
            (EVENTS_FILE, serde_json::to_string_pretty(&self.events)?),
            (FILTERS_FILE, serde_json::to_string_pretty(&self.filters)?),
            (CHART_FILE, serde_json::to_string_pretty(&self.chart)?),
        ];

        std::fs::create_dir_all(dir)?;

        let mut staged = Vec::with_capacity(rendered.len());
        for (name, body) in &rendered {
            let file = StagedFile {
                tmp: dir.join(format!(".{name}.tmp")),
                backup: dir.join(format!(".{name}.bak")),
                path: dir.join(name),
            };
            if let Err(e) = std::fs::write(&file.tmp, body) {
                discard(&staged);
                let _ = std::fs::remove_file(&file.tmp);
                return Err(e.into());
            }
            staged.push(file);
        }

        let mut committed: Vec<(&StagedFile, bool)> = Vec::with_capacity(staged.len());
        for (i, file) in staged.iter().enumerate() {
            match file.commit() {
                Ok(had_previous) => committed.push((file, had_previous)),
                Err(e) => {
                    warn!(
                        path = %file.path.display(),
                        error = %e,
                        "Artifact swap failed, rolling back"
                    );
                    for (done, had_previous) in committed.iter().rev() {
                        done.restore(*had_previous);
                    }
                    discard(&staged[i..]);
                    return Err(e.into());
                }
            }
        }

        let mut written = Vec::with_capacity(committed.len());
        for (file, had_previous) in committed {
            if had_previous {
                let _ = std::fs::remove_file(&file.backup);
            }
            info!(path = %file.path.display(), "Wrote artifact");
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

struct StagedFile {
    tmp: PathBuf,
    backup: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    /// Move the current file aside, then the staged one into place. Returns
    /// whether a previous file was moved aside.
    fn commit(&self) -> std::io::Result<bool> {
        let had_previous = self.path.is_file();
        if had_previous {
            std::fs::rename(&self.path, &self.backup)?;
        }
        if let Err(e) = std::fs::rename(&self.tmp, &self.path) {
            if had_previous {
                let _ = std::fs::rename(&self.backup, &self.path);
            }
            return Err(e);
        }
        Ok(had_previous)
    }

    /// Undo a successful `commit`.
    fn restore(&self, had_previous: bool) {
        if had_previous {
            let _ = std::fs::rename(&self.backup, &self.path);
        } else {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

fn discard(staged: &[StagedFile]) {
    for file in staged {
        let _ = std::fs::remove_file(&file.tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_common::IngestError;

    #[test]
    fn test_write_all_creates_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data");
        let artifacts = Artifacts {
            events: vec![],
            filters: FilterCatalog::default(),
            chart: ChartLayout::default(),
        };

        let written = artifacts.write_all(&out).unwrap();
        assert_eq!(written.len(), 3);

        let chart: ChartLayout =
            serde_json::from_str(&std::fs::read_to_string(out.join(CHART_FILE)).unwrap()).unwrap();
        assert_eq!(chart, ChartLayout::default());

        let leftovers: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    fn artifacts_with_rows(rows: usize) -> Artifacts {
        Artifacts {
            events: vec![],
            filters: FilterCatalog::default(),
            chart: ChartLayout {
                rows,
                ..Default::default()
            },
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_all_replaces_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        artifacts_with_rows(1).write_all(dir.path()).unwrap();
        artifacts_with_rows(7).write_all(dir.path()).unwrap();

        let chart: ChartLayout =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(CHART_FILE)).unwrap())
                .unwrap();
        assert_eq!(chart.rows, 7);
        assert_eq!(dir_entries(dir.path()), [CHART_FILE, EVENTS_FILE, FILTERS_FILE]);
    }

    #[test]
    fn test_failed_swap_restores_previous_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EVENTS_FILE), "previous events").unwrap();
        // A non-empty directory where a file should go makes that rename fail.
        let blocker = dir.path().join(FILTERS_FILE);
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();

        let result = artifacts_with_rows(3).write_all(dir.path());
        assert!(matches!(result, Err(IngestError::Io(_))));

        assert_eq!(
            std::fs::read_to_string(dir.path().join(EVENTS_FILE)).unwrap(),
            "previous events"
        );
        assert!(blocker.is_dir());
        assert_eq!(dir_entries(dir.path()), [EVENTS_FILE, FILTERS_FILE]);
    }

    #[test]
    fn test_failed_swap_without_previous_run_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CHART_FILE)).unwrap();

        assert!(artifacts_with_rows(3).write_all(dir.path()).is_err());
        assert_eq!(dir_entries(dir.path()), [CHART_FILE]);
        assert!(dir.path().join(CHART_FILE).is_dir());
    }
}
