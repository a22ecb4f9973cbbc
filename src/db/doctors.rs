use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::models::Doctor;

pub fn create_doctor(conn: &Connection, name: &str, specialization: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO Doctor (name, specialization) VALUES (?1, ?2)",
        params![name, specialization],
    )
    .context("failed to insert doctor")?;

    let id = conn.last_insert_rowid();
    debug!(id, "inserted doctor");
    Ok(id)
}

pub fn fetch_doctors(conn: &Connection) -> Result<Vec<Doctor>> {
    let mut stmt = conn
        .prepare("SELECT doc_id, name, specialization FROM Doctor ORDER BY doc_id")
        .context("failed to prepare doctor query")?;

    let doctors = stmt
        .query_map([], |row| {
            Ok(Doctor {
                id: row.get(0)?,
                name: row.get(1)?,
                specialization: row.get(2)?,
            })
        })
        .context("failed to load doctors")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect doctors")?;

    Ok(doctors)
}
