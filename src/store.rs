//! Saved-table persistence.
//!
//! The table lives in a single JSON file as nested arrays — the same
//! layout the text pane shows, unmasked and full width. A missing or
//! malformed file falls back to the factory map; the file itself is left
//! alone until the next successful save overwrites it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::table::{ROW_COUNT, ROW_WIDTH, Table};

pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved table, or the factory map when the file is missing
    /// or malformed.
    pub fn load(&self) -> Table {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No saved table at {}, using factory map", self.path.display());
                return Table::default();
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}", self.path.display());
                return Table::default();
            }
        };
        match parse(&text) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Ignoring malformed table in {}: {e}", self.path.display());
                Table::default()
            }
        }
    }

    /// Persist the full table, unused slots included.
    pub fn save(&self, table: &Table) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string(table)?)?;
        Ok(())
    }
}

fn parse(text: &str) -> anyhow::Result<Table> {
    let rows: [[u16; ROW_WIDTH]; ROW_COUNT] = serde_json::from_str(text)?;
    Table::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mode_id;

    fn store_in(dir: &tempfile::TempDir) -> Store {
        Store::new(dir.path().join("table.json"))
    }

    #[test]
    fn missing_file_loads_factory_map() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), Table::default());
    }

    #[test]
    fn save_then_load_round_trips_unmasked() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        // Slot 2 is beyond Pitch's single field; the stale value must
        // survive persistence untouched.
        let mut rows = *Table::default().rows();
        rows[0] = [mode_id::PITCH, 0x92, 24, 0, 0, 0, 0];
        let table = Table::from_rows(rows).unwrap();

        store.save(&table).unwrap();
        assert_eq!(store.load(), table);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested/deeper/table.json"));
        store.save(&Table::default()).unwrap();
        assert_eq!(store.load(), Table::default());
    }

    #[test]
    fn saved_file_is_json_nested_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Table::default()).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[[0,144,24,0,0,0,0],"));
    }

    #[test]
    fn corrupt_json_falls_back_and_is_left_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json").unwrap();

        assert_eq!(store.load(), Table::default());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "not json");
    }

    #[test]
    fn wrong_shape_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[[1, 2, 3]]").unwrap();
        assert_eq!(store.load(), Table::default());
    }

    #[test]
    fn unknown_mode_id_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            "[[9,144,24,0,0,0,0],[0,144,25,0,0,0,0],[0,144,26,0,0,0,0],[0,144,27,0,0,0,0],\
             [0,144,28,0,0,0,0],[0,144,29,0,0,0,0],[0,144,30,0,0,0,0],[0,144,31,0,0,0,0]]",
        )
        .unwrap();
        assert_eq!(store.load(), Table::default());
    }
}
