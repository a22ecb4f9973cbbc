//! Generic form engine. A `FormSpec` declares an ordered list of labelled,
//! typed fields plus the store call to run on submit; `FormState` holds the
//! raw text while the user types and turns it into typed values all at once.

use std::fmt;
use std::vec;

use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;
use tracing::{info, warn};

use super::helpers::surface_error;
use crate::db::RecordStore;

/// Target type of a single input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
}

impl FieldKind {
    fn placeholder(self) -> &'static str {
        match self {
            FieldKind::Text => "<text>",
            FieldKind::Integer => "<integer>",
            FieldKind::Decimal => "<number>",
        }
    }
}

/// One entry of a form's field spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
        }
    }

    pub const fn integer(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Integer,
        }
    }

    pub const fn decimal(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Decimal,
        }
    }

    /// Convert raw input to this field's type. Text is passed through as typed;
    /// numbers are parsed after trimming surrounding whitespace. Decimals must
    /// be finite: SQLite stores NaN as NULL, which the bill table cannot read
    /// back.
    pub fn coerce(&self, raw: &str) -> Result<FieldValue, FieldError> {
        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| FieldError::Integer {
                    label: self.label,
                    input: raw.to_string(),
                }),
            FieldKind::Decimal => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(FieldValue::Decimal)
                .ok_or_else(|| FieldError::Decimal {
                    label: self.label,
                    input: raw.to_string(),
                }),
        }
    }
}

/// A successfully coerced input.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => write!(f, "{value}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Decimal(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("{label}: invalid literal for integer: {input:?}")]
    Integer { label: &'static str, input: String },
    #[error("{label}: could not convert to a number: {input:?}")]
    Decimal { label: &'static str, input: String },
}

/// Coerced values in declared field order. Submit callbacks take them one at
/// a time, in the same order the spec lists the fields.
#[derive(Debug)]
pub struct Values {
    inner: vec::IntoIter<FieldValue>,
}

impl Values {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }

    pub fn text(&mut self) -> Result<String> {
        match self.inner.next() {
            Some(FieldValue::Text(value)) => Ok(value),
            other => Err(mismatch("text", other)),
        }
    }

    pub fn integer(&mut self) -> Result<i64> {
        match self.inner.next() {
            Some(FieldValue::Integer(value)) => Ok(value),
            other => Err(mismatch("integer", other)),
        }
    }

    pub fn decimal(&mut self) -> Result<f64> {
        match self.inner.next() {
            Some(FieldValue::Decimal(value)) => Ok(value),
            other => Err(mismatch("decimal", other)),
        }
    }
}

fn mismatch(expected: &str, found: Option<FieldValue>) -> anyhow::Error {
    match found {
        Some(value) => anyhow!("expected {expected} input, found {value}"),
        None => anyhow!("expected {expected} input, but the form has no more fields"),
    }
}

/// Store call run with the coerced values; returns the id of the new row.
pub type SubmitFn = fn(&RecordStore, Values) -> Result<i64>;

/// Declarative description of a form.
#[derive(Copy, Clone)]
pub struct FormSpec {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    pub submit: SubmitFn,
}

impl fmt::Debug for FormSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSpec")
            .field("title", &self.title)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Outcome of a submission that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: &'static str,
    pub id: i64,
}

impl Submission {
    pub fn message(&self) -> String {
        format!("{} successful! (id {})", self.title, self.id)
    }
}

/// Live state of an open form: one raw buffer per field.
#[derive(Clone, Debug)]
pub struct FormState {
    spec: FormSpec,
    inputs: Vec<String>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl FormState {
    pub fn new(spec: FormSpec) -> Self {
        Self {
            spec,
            inputs: vec![String::new(); spec.fields.len()],
            active: 0,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.spec.title
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.spec.fields
    }

    pub fn input(&self, index: usize) -> &str {
        self.inputs.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn next_field(&mut self) {
        if !self.inputs.is_empty() {
            self.active = (self.active + 1) % self.inputs.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.inputs.is_empty() {
            self.active = (self.active + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    /// Append a character to the active field. Control characters are
    /// ignored; everything else is accepted and checked on submit.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.inputs.get_mut(self.active) {
            Some(input) => {
                input.push(ch);
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.inputs.get_mut(self.active) {
            input.pop();
        }
    }

    /// Convert every field, stopping at the first failure.
    pub fn coerce(&self) -> Result<Vec<FieldValue>, FieldError> {
        self.spec
            .fields
            .iter()
            .zip(&self.inputs)
            .map(|(field, raw)| field.coerce(raw))
            .collect()
    }

    /// Coerce all inputs and, only if every one converts, run the submit
    /// callback once. On failure the inputs are kept and `error` is set.
    pub fn submit(&mut self, store: &RecordStore) -> Result<Submission> {
        let submit = self.spec.submit;
        let outcome = self
            .coerce()
            .map_err(anyhow::Error::from)
            .and_then(|values| submit(store, Values::new(values)));

        match outcome {
            Ok(id) => {
                self.error = None;
                info!(form = self.spec.title, id, "form submitted");
                Ok(Submission {
                    title: self.spec.title,
                    id,
                })
            }
            Err(err) => {
                warn!(form = self.spec.title, error = %err, "form submission failed");
                self.error = Some(format!("Invalid input. {}", surface_error(&err)));
                Err(err)
            }
        }
    }

    /// Styled `Label: value` line for the field at `index`.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.spec.fields.get(index) else {
            return Line::from("");
        };
        let value = self.input(index);
        let is_active = self.active == index;

        let display = if value.is_empty() {
            field.kind.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset within the active line.
    pub(crate) fn cursor_offset(&self) -> usize {
        let label_len = self
            .spec
            .fields
            .get(self.active)
            .map(|field| field.label.chars().count() + 2)
            .unwrap_or(0);
        label_len + self.input(self.active).chars().count()
    }
}
