//! The four front-desk forms. Each one is just a field list and the store call
//! it feeds; the form engine handles everything else.

use anyhow::Result;

use super::forms::{FieldSpec, FormSpec, Values};
use crate::db::RecordStore;

pub const ADD_PATIENT: FormSpec = FormSpec {
    title: "Add Patient",
    fields: &[
        FieldSpec::text("Name"),
        FieldSpec::integer("Age"),
        FieldSpec::text("Gender"),
        FieldSpec::text("Phone"),
    ],
    submit: add_patient,
};

pub const ADD_DOCTOR: FormSpec = FormSpec {
    title: "Add Doctor",
    fields: &[FieldSpec::text("Name"), FieldSpec::text("Specialization")],
    submit: add_doctor,
};

pub const BOOK_APPOINTMENT: FormSpec = FormSpec {
    title: "Book Appointment",
    fields: &[
        FieldSpec::integer("Patient ID"),
        FieldSpec::integer("Doctor ID"),
        FieldSpec::text("Date (YYYY-MM-DD)"),
        FieldSpec::text("Time (HH:MM)"),
    ],
    submit: book_appointment,
};

pub const GENERATE_BILL: FormSpec = FormSpec {
    title: "Generate Bill",
    fields: &[FieldSpec::integer("Patient ID"), FieldSpec::decimal("Amount")],
    submit: generate_bill,
};

fn add_patient(store: &RecordStore, mut values: Values) -> Result<i64> {
    let name = values.text()?;
    let age = values.integer()?;
    let gender = values.text()?;
    let phone = values.text()?;
    store.insert_patient(&name, age, &gender, &phone)
}

fn add_doctor(store: &RecordStore, mut values: Values) -> Result<i64> {
    let name = values.text()?;
    let specialization = values.text()?;
    store.insert_doctor(&name, &specialization)
}

fn book_appointment(store: &RecordStore, mut values: Values) -> Result<i64> {
    let patient_id = values.integer()?;
    let doctor_id = values.integer()?;
    let date = values.text()?;
    let time = values.text()?;
    store.insert_appointment(patient_id, doctor_id, &date, &time)
}

fn generate_bill(store: &RecordStore, mut values: Values) -> Result<i64> {
    let patient_id = values.integer()?;
    let amount = values.decimal()?;
    store.insert_bill(patient_id, amount)
}
