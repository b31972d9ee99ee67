// taskd: Task Catalog — read-only map of task name to (C, T, D)

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ServerError, ServerResult};

/// Maximum task name length accepted anywhere in the system.
pub const MAX_NAME_LEN: usize = 19;

/// Immutable catalog entry: worst-case execution cost, period, and relative
/// deadline of a periodic task, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskParameters {
    pub c: f64,
    pub t: f64,
    pub d: f64,
}

/// Read-only `name -> TaskParameters` map, populated once at startup.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    entries: HashMap<String, TaskParameters>,
}

impl TaskCatalog {
    /// Load whitespace-separated records `<name> <C> <T> <D>` from `path`,
    /// stopping at `max_tasks` records or at the first record that fails to
    /// scan — blank lines between records are skipped, but a malformed
    /// record ends the scan there and everything after it in the file is
    /// discarded, the same as a `scanf` loop whose format stops matching.
    /// Only a catalog with zero valid records is a fatal error.
    pub fn load(path: impl AsRef<Path>, max_tasks: usize) -> ServerResult<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|source| ServerError::CatalogUnreadable {
            path: path_ref.display().to_string(),
            source,
        })?;

        let mut entries = HashMap::new();
        for (line_no, line) in content.lines().enumerate() {
            if entries.len() >= max_tasks {
                tracing::warn!(max_tasks, "task catalog truncated at capacity");
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match parse_record(trimmed) {
                Ok((name, params)) => {
                    entries.insert(name, params);
                }
                Err(reason) => {
                    tracing::warn!(line = line_no + 1, %reason, "catalog record did not scan, stopping load here");
                    break;
                }
            }
        }

        if entries.is_empty() {
            return Err(ServerError::CatalogEmpty {
                path: path_ref.display().to_string(),
            });
        }

        tracing::info!(count = entries.len(), path = %path_ref.display(), "loaded task catalog");
        Ok(Self { entries })
    }

    /// Looks up a task's parameters by name; `None` if it isn't in the catalog.
    pub fn lookup(&self, name: &str) -> Option<TaskParameters> {
        self.entries.get(name).copied()
    }
}

fn parse_record(line: &str) -> Result<(String, TaskParameters), &'static str> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().ok_or("missing name")?;
    let c = tokens.next().ok_or("missing C")?;
    let t = tokens.next().ok_or("missing T")?;
    let d = tokens.next().ok_or("missing D")?;
    if tokens.next().is_some() {
        return Err("too many tokens");
    }
    if name.len() > MAX_NAME_LEN {
        return Err("name too long");
    }
    let c: f64 = c.parse().map_err(|_| "C not numeric")?;
    let t: f64 = t.parse().map_err(|_| "T not numeric")?;
    let d: f64 = d.parse().map_err(|_| "D not numeric")?;
    if !(c > 0.0) || !(t > 0.0) || !(d > 0.0) {
        return Err("C, T, D must be positive");
    }
    Ok((name.to_string(), TaskParameters { c, t, d }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_records() {
        let file = write_catalog("A 100 500 500\nB 100 500 500\n");
        let catalog = TaskCatalog::load(file.path(), 50).unwrap();
        assert_eq!(catalog.lookup("A"), Some(TaskParameters { c: 100.0, t: 500.0, d: 500.0 }));
        assert_eq!(catalog.lookup("B"), Some(TaskParameters { c: 100.0, t: 500.0, d: 500.0 }));
        assert_eq!(catalog.lookup("C"), None);
    }

    #[test]
    fn stops_at_first_malformed_record_and_keeps_what_loaded_before_it() {
        let file = write_catalog("A 100 500 500\nBOGUS not numbers here\nB 50 200 200\n");
        let catalog = TaskCatalog::load(file.path(), 50).unwrap();
        assert_eq!(catalog.lookup("A").unwrap().c, 100.0);
        assert_eq!(catalog.lookup("B"), None, "B comes after the malformed record and is never reached");
        assert_eq!(catalog.lookup("BOGUS"), None);
    }

    #[test]
    fn blank_lines_between_records_do_not_stop_the_scan() {
        let file = write_catalog("A 100 500 500\n\nB 50 200 200\n");
        let catalog = TaskCatalog::load(file.path(), 50).unwrap();
        assert_eq!(catalog.lookup("A").unwrap().c, 100.0);
        assert_eq!(catalog.lookup("B").unwrap().c, 50.0);
    }

    #[test]
    fn zero_valid_records_is_fatal() {
        let file = write_catalog("garbage line\nmore garbage\n");
        let err = TaskCatalog::load(file.path(), 50).unwrap_err();
        assert!(matches!(err, ServerError::CatalogEmpty { .. }));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = TaskCatalog::load("/nonexistent/path/tasks.config", 50).unwrap_err();
        assert!(matches!(err, ServerError::CatalogUnreadable { .. }));
    }

    #[test]
    fn truncates_at_max_tasks() {
        let file = write_catalog("A 1 1 1\nB 1 1 1\nC 1 1 1\n");
        let catalog = TaskCatalog::load(file.path(), 2).unwrap();
        assert_eq!(catalog.entries.len(), 2);
    }

    #[test]
    fn rejects_name_over_19_chars() {
        let file = write_catalog("OK 1 1 1\nThisNameIsWayTooLongForTheLimit 1 1 1\nAfter 1 1 1\n");
        let catalog = TaskCatalog::load(file.path(), 50).unwrap();
        assert_eq!(catalog.lookup("OK").unwrap().c, 1.0);
        assert_eq!(catalog.lookup("After"), None, "the scan stops at the overlong name");
        assert_eq!(catalog.entries.len(), 1);
    }
}
