use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::models::Appointment;

/// Book a slot. The patient and doctor ids are written as given; there is no
/// lookup to confirm either one exists.
pub fn create_appointment(
    conn: &Connection,
    patient_id: i64,
    doctor_id: i64,
    date: &str,
    time: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO Appointment (patient_id, doc_id, date, time) VALUES (?1, ?2, ?3, ?4)",
        params![patient_id, doctor_id, date, time],
    )
    .context("failed to insert appointment")?;

    let id = conn.last_insert_rowid();
    debug!(id, patient_id, doctor_id, "booked appointment");
    Ok(id)
}

pub fn fetch_appointments(conn: &Connection) -> Result<Vec<Appointment>> {
    let mut stmt = conn
        .prepare(
            "SELECT appoint_id, patient_id, doc_id, date, time
             FROM Appointment
             ORDER BY appoint_id",
        )
        .context("failed to prepare appointment query")?;

    let appointments = stmt
        .query_map([], |row| {
            Ok(Appointment {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                doctor_id: row.get(2)?,
                date: row.get(3)?,
                time: row.get(4)?,
            })
        })
        .context("failed to load appointments")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect appointments")?;

    Ok(appointments)
}
