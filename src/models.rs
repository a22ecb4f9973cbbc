//! Row types for the four front-desk tables. They are plain data holders; the
//! store is the source of truth and the UI only ever keeps snapshots.

/// A registered patient. `id` is assigned by SQLite on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
}

/// A booked slot. `patient_id` and `doctor_id` are soft references: nothing
/// checks that the referenced rows exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// Expected as `YYYY-MM-DD`, stored verbatim.
    pub date: String,
    /// Expected as `HH:MM`, stored verbatim.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub id: i64,
    pub patient_id: i64,
    pub amount: f64,
}
