use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Handle to the on-disk front-desk database. It only remembers where the file
/// lives: every operation opens its own connection and drops it before
/// returning, so nothing stays open while the UI waits for input.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the four tables if they are missing. Existing tables and rows are
    /// left alone, so this runs on every startup.
    pub fn initialize(&self) -> Result<()> {
        self.with_connection(create_schema)?;
        info!(path = %self.path.display(), "record store initialized");
        Ok(())
    }

    /// Open a connection, hand it to `work`, and close it afterwards. Each
    /// statement autocommits, so one call is one durable unit of work.
    pub(crate) fn with_connection<T>(
        &self,
        work: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let conn = open_connection(&self.path)?;
        let result = work(&conn);
        drop(conn);
        debug!("connection released");
        result
    }
}

/// Open the database file. Foreign keys stay off: appointments and bills are
/// allowed to point at ids that were never inserted.
fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
    conn.execute("PRAGMA foreign_keys = OFF", [])
        .context("failed to configure foreign keys")?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Patient (
            patient_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            age INTEGER,
            gender TEXT,
            phone TEXT
        )",
        [],
    )
    .context("failed to create Patient table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Doctor (
            doc_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            specialization TEXT
        )",
        [],
    )
    .context("failed to create Doctor table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Appointment (
            appoint_id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER,
            doc_id INTEGER,
            date TEXT,
            time TEXT,
            FOREIGN KEY(patient_id) REFERENCES Patient(patient_id),
            FOREIGN KEY(doc_id) REFERENCES Doctor(doc_id)
        )",
        [],
    )
    .context("failed to create Appointment table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Bill (
            bill_id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER,
            amount REAL,
            FOREIGN KEY(patient_id) REFERENCES Patient(patient_id)
        )",
        [],
    )
    .context("failed to create Bill table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table_names(store: &RecordStore) -> Vec<String> {
        store
            .with_connection(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                     ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .unwrap()
    }

    #[test]
    fn initialize_creates_all_four_tables() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("hospital.db"));
        store.initialize().unwrap();

        assert_eq!(
            table_names(&store),
            vec!["Appointment", "Bill", "Doctor", "Patient"]
        );
    }

    #[test]
    fn initialize_twice_keeps_rows() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("hospital.db"));
        store.initialize().unwrap();
        store.insert_patient("Alice", 34, "F", "555-1111").unwrap();
        store.insert_bill(1, 12.5).unwrap();

        store.initialize().unwrap();

        assert_eq!(
            table_names(&store),
            vec!["Appointment", "Bill", "Doctor", "Patient"]
        );
        assert_eq!(store.list_patients().unwrap().len(), 1);
        assert_eq!(store.list_bills().unwrap().len(), 1);
    }

    #[test]
    fn missing_directory_surfaces_open_error() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("missing").join("hospital.db"));
        let err = store.initialize().unwrap_err();
        assert!(err.to_string().contains("failed to open SQLite database"));
    }
}
