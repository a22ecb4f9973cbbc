use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::models::Patient;

/// Append a patient row and return the id SQLite assigned to it.
pub fn create_patient(
    conn: &Connection,
    name: &str,
    age: i64,
    gender: &str,
    phone: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO Patient (name, age, gender, phone) VALUES (?1, ?2, ?3, ?4)",
        params![name, age, gender, phone],
    )
    .context("failed to insert patient")?;

    let id = conn.last_insert_rowid();
    debug!(id, "inserted patient");
    Ok(id)
}

/// Every patient in insertion order.
pub fn fetch_patients(conn: &Connection) -> Result<Vec<Patient>> {
    let mut stmt = conn
        .prepare("SELECT patient_id, name, age, gender, phone FROM Patient ORDER BY patient_id")
        .context("failed to prepare patient query")?;

    let patients = stmt
        .query_map([], |row| {
            Ok(Patient {
                id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                gender: row.get(3)?,
                phone: row.get(4)?,
            })
        })
        .context("failed to load patients")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect patients")?;

    Ok(patients)
}
