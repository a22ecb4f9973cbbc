//! Core library surface for the hospital front-desk TUI.
//!
//! The binary only wires these pieces together; tests and any future tooling
//! reach the record store and form engine through the same re-exports.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::AppConfig;

/// Explicit handle to the SQLite file; every operation opens and closes its
/// own connection.
pub use db::RecordStore;

/// The four entity row types.
pub use models::{Appointment, Bill, Doctor, Patient};

/// Form engine pieces and the four front-desk forms built on it.
pub use ui::features::{ADD_DOCTOR, ADD_PATIENT, BOOK_APPOINTMENT, GENERATE_BILL};
pub use ui::forms::{
    FieldError, FieldKind, FieldSpec, FieldValue, FormSpec, FormState, Submission, Values,
};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
