use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::models::Bill;

pub fn create_bill(conn: &Connection, patient_id: i64, amount: f64) -> Result<i64> {
    conn.execute(
        "INSERT INTO Bill (patient_id, amount) VALUES (?1, ?2)",
        params![patient_id, amount],
    )
    .context("failed to insert bill")?;

    let id = conn.last_insert_rowid();
    debug!(id, patient_id, amount, "generated bill");
    Ok(id)
}

pub fn fetch_bills(conn: &Connection) -> Result<Vec<Bill>> {
    let mut stmt = conn
        .prepare("SELECT bill_id, patient_id, amount FROM Bill ORDER BY bill_id")
        .context("failed to prepare bill query")?;

    let bills = stmt
        .query_map([], |row| {
            Ok(Bill {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                amount: row.get(2)?,
            })
        })
        .context("failed to load bills")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect bills")?;

    Ok(bills)
}
