//! Persistence module split across logical submodules. The per-table files
//! hold single-statement functions over a borrowed `Connection`; `RecordStore`
//! wraps each of them in its own short-lived connection.

mod appointments;
mod bills;
mod connection;
mod doctors;
mod patients;

pub use appointments::{create_appointment, fetch_appointments};
pub use bills::{create_bill, fetch_bills};
pub use connection::RecordStore;
pub use doctors::{create_doctor, fetch_doctors};
pub use patients::{create_patient, fetch_patients};

use anyhow::Result;

use crate::models::{Appointment, Bill, Doctor, Patient};

impl RecordStore {
    pub fn insert_patient(&self, name: &str, age: i64, gender: &str, phone: &str) -> Result<i64> {
        self.with_connection(|conn| create_patient(conn, name, age, gender, phone))
    }

    pub fn insert_doctor(&self, name: &str, specialization: &str) -> Result<i64> {
        self.with_connection(|conn| create_doctor(conn, name, specialization))
    }

    pub fn insert_appointment(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: &str,
        time: &str,
    ) -> Result<i64> {
        self.with_connection(|conn| create_appointment(conn, patient_id, doctor_id, date, time))
    }

    pub fn insert_bill(&self, patient_id: i64, amount: f64) -> Result<i64> {
        self.with_connection(|conn| create_bill(conn, patient_id, amount))
    }

    /// Fully materialized snapshot of the patient table in insertion order.
    pub fn list_patients(&self) -> Result<Vec<Patient>> {
        self.with_connection(fetch_patients)
    }

    pub fn list_doctors(&self) -> Result<Vec<Doctor>> {
        self.with_connection(fetch_doctors)
    }

    pub fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.with_connection(fetch_appointments)
    }

    pub fn list_bills(&self) -> Result<Vec<Bill>> {
        self.with_connection(fetch_bills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn test_store() -> (TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("hospital.db"));
        store.initialize().unwrap();
        (dir, store)
    }

    #[test]
    fn patient_insert_and_list() {
        let (_dir, store) = test_store();
        let id = store.insert_patient("Alice", 34, "F", "555-1111").unwrap();

        let patients = store.list_patients().unwrap();
        assert_eq!(
            patients,
            vec![Patient {
                id,
                name: "Alice".into(),
                age: 34,
                gender: "F".into(),
                phone: "555-1111".into(),
            }]
        );
    }

    #[test]
    fn patients_come_back_in_insertion_order() {
        let (_dir, store) = test_store();
        let first = store.insert_patient("Zed", 70, "M", "555-0001").unwrap();
        let second = store.insert_patient("Amy", 5, "F", "555-0002").unwrap();
        assert!(second > first);

        let names: Vec<_> = store
            .list_patients()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }

    #[test]
    fn ids_are_strictly_increasing_per_table() {
        let (_dir, store) = test_store();
        let d1 = store.insert_doctor("House", "Diagnostics").unwrap();
        let d2 = store.insert_doctor("Grey", "Surgery").unwrap();
        let d3 = store.insert_doctor("Quinn", "General").unwrap();
        assert!(d1 < d2 && d2 < d3);

        // other tables keep their own sequence
        let b1 = store.insert_bill(d3, 10.0).unwrap();
        assert_eq!(b1, 1);
    }

    #[test]
    fn appointment_for_unknown_patient_is_written() {
        let (_dir, store) = test_store();
        assert!(store.list_patients().unwrap().is_empty());

        let id = store
            .insert_appointment(1, 2, "2024-01-01", "09:00")
            .unwrap();

        assert_eq!(
            store.list_appointments().unwrap(),
            vec![Appointment {
                id,
                patient_id: 1,
                doctor_id: 2,
                date: "2024-01-01".into(),
                time: "09:00".into(),
            }]
        );
    }

    #[test]
    fn bill_for_unknown_patient_keeps_amount() {
        let (_dir, store) = test_store();
        store.insert_bill(42, 199.99).unwrap();

        let bills = store.list_bills().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].patient_id, 42);
        assert_eq!(bills[0].amount, 199.99);
    }

    #[test]
    fn doctors_round_trip() {
        let (_dir, store) = test_store();
        let id = store.insert_doctor("Strange", "Neurosurgery").unwrap();
        assert_eq!(
            store.list_doctors().unwrap(),
            vec![Doctor {
                id,
                name: "Strange".into(),
                specialization: "Neurosurgery".into(),
            }]
        );
    }

    #[test]
    fn inserts_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("hospital.db"));
        let err = store.insert_patient("Alice", 34, "F", "555-1111").unwrap_err();
        assert!(err.to_string().contains("failed to insert patient"));
    }

    #[test]
    fn writes_are_visible_to_a_fresh_handle() {
        let (dir, store) = test_store();
        store.insert_patient("Alice", 34, "F", "555-1111").unwrap();

        let reopened = RecordStore::new(dir.path().join("hospital.db"));
        assert_eq!(reopened.list_patients().unwrap().len(), 1);
    }
}
