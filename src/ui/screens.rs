use anyhow::{Context, Result};

use super::features::{ADD_DOCTOR, ADD_PATIENT, BOOK_APPOINTMENT, GENERATE_BILL};
use super::forms::FormSpec;
use crate::db::RecordStore;
use crate::models::Patient;

/// Entries of the main menu, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    AddPatient,
    AddDoctor,
    BookAppointment,
    GenerateBill,
    ViewPatients,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::AddPatient,
        MenuAction::AddDoctor,
        MenuAction::BookAppointment,
        MenuAction::GenerateBill,
        MenuAction::ViewPatients,
        MenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddPatient => "Add Patient",
            MenuAction::AddDoctor => "Add Doctor",
            MenuAction::BookAppointment => "Book Appointment",
            MenuAction::GenerateBill => "Generate Bill",
            MenuAction::ViewPatients => "View Patients",
            MenuAction::Exit => "Exit",
        }
    }

    /// The form this action opens, if it is a data-entry action.
    pub fn form(self) -> Option<FormSpec> {
        match self {
            MenuAction::AddPatient => Some(ADD_PATIENT),
            MenuAction::AddDoctor => Some(ADD_DOCTOR),
            MenuAction::BookAppointment => Some(BOOK_APPOINTMENT),
            MenuAction::GenerateBill => Some(GENERATE_BILL),
            MenuAction::ViewPatients | MenuAction::Exit => None,
        }
    }

    /// Map the `1`-`6` shortcut keys onto menu entries.
    pub fn from_digit(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)? as usize;
        index
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }
}

/// Cursor over the main menu.
#[derive(Default)]
pub(crate) struct MenuScreen {
    pub(crate) selected: usize,
}

impl MenuScreen {
    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = MenuAction::ALL.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn current(&self) -> MenuAction {
        MenuAction::ALL[self.selected.min(MenuAction::ALL.len() - 1)]
    }
}

/// Read-only snapshot of the patient table. It is loaded once when the view
/// opens and never refreshed while open.
pub(crate) struct PatientTable {
    pub(crate) patients: Vec<Patient>,
    pub(crate) selected: usize,
}

impl PatientTable {
    pub(crate) fn load(store: &RecordStore) -> Result<Self> {
        let patients = store
            .list_patients()
            .context("failed to load patient list")?;
        Ok(Self {
            patients,
            selected: 0,
        })
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.patients.is_empty() {
            return;
        }
        let len = self.patients.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    /// Cells for one table row: ID, Name, Age, Gender, Phone.
    pub(crate) fn row_cells(patient: &Patient) -> [String; 5] {
        [
            patient.id.to_string(),
            patient.name.clone(),
            patient.age.to_string(),
            patient.gender.clone(),
            patient.phone.clone(),
        ]
    }
}
