//! Parameter extraction from a page's navigation context.
//!
//! A context is read once when the flow is mounted. Extraction is pure: it
//! never touches the network and either yields every required field or a
//! [`ValidationError`] naming what is wrong.

use super::error::ValidationError;
use std::collections::{BTreeMap, HashMap};

/// Read-only view of the query string, form body and/or dynamic path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    values: HashMap<String, String>,
}

impl NavigationContext {
    #[must_use]
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Add a dynamic path segment under `name`; it wins over a query value of the same name.
    #[must_use]
    pub fn with_segment(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NavigationContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed, non-empty text.
    Text,
    /// Base-10 `i64`.
    Integer,
    /// Non-empty text kept verbatim (passwords are never trimmed).
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
        }
    }

    #[must_use]
    pub const fn secret(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Secret,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

/// Validated parameters; immutable once captured.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationRequestParams {
    values: BTreeMap<&'static str, ParamValue>,
}

// Values may hold passwords, only the field names are printed.
impl std::fmt::Debug for VerificationRequestParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl VerificationRequestParams {
    /// # Errors
    /// Returns [`ValidationError::Missing`] if `name` was not extracted as text.
    pub fn text(&self, name: &'static str) -> Result<&str, ValidationError> {
        match self.values.get(name) {
            Some(ParamValue::Text(value)) => Ok(value.as_str()),
            _ => Err(ValidationError::Missing(vec![name])),
        }
    }

    /// # Errors
    /// Returns [`ValidationError::Missing`] if `name` was not extracted as an integer.
    pub fn integer(&self, name: &'static str) -> Result<i64, ValidationError> {
        match self.values.get(name) {
            Some(ParamValue::Integer(value)) => Ok(*value),
            _ => Err(ValidationError::Missing(vec![name])),
        }
    }
}

/// Extract `fields` from `context`.
///
/// All missing fields are reported together; malformed integers are only
/// reported once nothing is missing.
///
/// # Errors
/// Returns a [`ValidationError`] for missing/blank fields or unparsable integers.
pub fn extract(
    context: &NavigationContext,
    fields: &[Field],
) -> Result<VerificationRequestParams, ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|field| {
            context.get(field.name).map_or(true, |value| match field.kind {
                FieldKind::Secret => value.is_empty(),
                FieldKind::Text | FieldKind::Integer => value.trim().is_empty(),
            })
        })
        .map(|field| field.name)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::Missing(missing));
    }

    let mut values = BTreeMap::new();
    for field in fields {
        let raw = context.get(field.name).unwrap_or_default();
        let value = match field.kind {
            FieldKind::Text => ParamValue::Text(raw.trim().to_string()),
            FieldKind::Secret => ParamValue::Text(raw.to_string()),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(ParamValue::Integer)
                .map_err(|_| ValidationError::Malformed(field.name))?,
        };
        values.insert(field.name, value);
    }

    Ok(VerificationRequestParams { values })
}
