//! Declarative description of the 13 student attributes the prediction
//! service expects, and the ordered value mapping built from it.
//!
//! Rendering and validation both iterate over [`ATTRIBUTES`], so adding a
//! field or an option only touches this table.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::FieldError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free-form number input.
    Number { step: &'static str },
    /// Closed enumeration; the submitted value is the option index.
    Choice { options: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const YES_NO: &[&str] = &["No", "Yes"];
const LEVELS: &[&str] = &["None", "Low", "Moderate", "High", "Very High"];

pub const ATTRIBUTES: [Field; 13] = [
    Field { name: "Age", kind: FieldKind::Number { step: "1" } },
    Field { name: "Gender", kind: FieldKind::Choice { options: &["Male", "Female"] } },
    Field {
        name: "Ethnicity",
        kind: FieldKind::Choice {
            options: &["Group A", "Group B", "Group C", "Group D", "Group E"],
        },
    },
    Field {
        name: "ParentalEducation",
        kind: FieldKind::Choice {
            options: &["None", "High School", "Bachelor", "Master", "Doctorate"],
        },
    },
    Field { name: "StudyTimeWeekly", kind: FieldKind::Number { step: "1" } },
    Field { name: "Absences", kind: FieldKind::Number { step: "1" } },
    Field { name: "Tutoring", kind: FieldKind::Choice { options: YES_NO } },
    Field { name: "ParentalSupport", kind: FieldKind::Choice { options: LEVELS } },
    Field { name: "Extracurricular", kind: FieldKind::Choice { options: YES_NO } },
    Field { name: "Sports", kind: FieldKind::Choice { options: YES_NO } },
    Field { name: "Music", kind: FieldKind::Choice { options: YES_NO } },
    Field { name: "Volunteering", kind: FieldKind::Choice { options: YES_NO } },
    Field { name: "GPA", kind: FieldKind::Number { step: "0.01" } },
];

pub fn field(name: &str) -> Option<&'static Field> {
    ATTRIBUTES.iter().find(|f| f.name == name)
}

fn position(name: &str) -> Option<usize> {
    ATTRIBUTES.iter().position(|f| f.name == name)
}

/// "ParentalEducation" -> "Parental Education". Acronyms stay split per
/// letter, so "GPA" becomes "G P A".
pub fn display_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}

/// Validates a non-empty value against the field's declared kind.
pub fn check_value(field: &Field, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Empty(field.name));
    }

    match field.kind {
        FieldKind::Number { .. } => match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(()),
            _ => Err(FieldError::NotANumber(field.name)),
        },
        FieldKind::Choice { options } => match value.parse::<usize>() {
            Ok(idx) if idx < options.len() => Ok(()),
            _ => Err(FieldError::UnknownOption {
                field: field.name,
                value: value.to_string(),
            }),
        },
    }
}

/// String values for every attribute, kept in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeValues {
    values: [String; 13],
}

impl AttributeValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        position(name).map(|idx| self.values[idx].as_str())
    }

    /// Stores the value with surrounding whitespace removed, so what is
    /// validated is exactly what gets sent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let idx = position(name).ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let value = value.into();
        self.values[idx] = value.trim().to_string();
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, &str)> {
        ATTRIBUTES.iter().zip(self.values.iter().map(String::as_str))
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field.name)
            .collect()
    }

    /// All constraint failures, empty fields included.
    pub fn validate(&self) -> Vec<FieldError> {
        self.iter()
            .filter_map(|(field, value)| check_value(field, value).err())
            .collect()
    }
}

impl Serialize for AttributeValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ATTRIBUTES.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name, value)?;
        }
        map.end()
    }
}
