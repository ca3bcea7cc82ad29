//! Request validation pipeline.
//!
//! One short-circuiting pipeline serves every entity. Each entity declares an
//! [`EntitySchema`] (field name, kind, required flag, error messages) and the
//! handlers run request bodies and path identifiers through it before anything
//! reaches the store.

mod schemas;

pub use schemas::*;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::dates::parse_datetime;
use crate::errors::AppError;

/// How a field's raw JSON value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string, trimmed
    Text,
    /// JSON number or a string that parses as one
    Number,
    /// Whole JSON number
    Integer,
    /// String in one of the accepted date forms
    Date,
    /// JSON boolean
    Bool,
}

/// Validation rule for a single body field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub invalid_message: &'static str,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind, invalid: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            invalid_message: invalid,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, invalid: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            invalid_message: invalid,
        }
    }
}

/// Identifier contract for path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFormat {
    /// Hyphenated 36-character UUID
    Uuid,
}

impl IdFormat {
    pub fn matches(&self, id: &str) -> bool {
        match self {
            IdFormat::Uuid => id.len() == 36 && uuid::Uuid::try_parse(id).is_ok(),
        }
    }
}

/// Field rules and messages for one entity.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub entity: &'static str,
    pub fields: &'static [FieldRule],
    pub missing_message: &'static str,
    pub id_format: IdFormat,
    pub invalid_id_message: &'static str,
    pub not_found_message: &'static str,
}

/// Which request shape is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// New record, required fields must be present
    Create,
    /// Full overwrite of an existing record, required fields must be present
    Replace,
    /// Partial update, only present fields are checked
    Patch,
}

/// A parsed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(DateTime<Utc>),
    Bool(bool),
    /// Explicit JSON `null`
    Null,
}

/// Output of a successful validation pass. Only fields named by the schema are kept.
#[derive(Debug, Clone, Default)]
pub struct ValidatedFields {
    values: HashMap<&'static str, FieldValue>,
}

impl ValidatedFields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FieldValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.get(name) {
            Some(FieldValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// `None` when absent, `Some(None)` when explicitly null.
    pub fn nullable_text(&self, name: &str) -> Option<Option<String>> {
        match self.get(name)? {
            FieldValue::Null => Some(None),
            FieldValue::Text(s) => Some(Some(s.clone())),
            _ => None,
        }
    }

    /// `None` when absent, `Some(None)` when explicitly null.
    pub fn nullable_date(&self, name: &str) -> Option<Option<DateTime<Utc>>> {
        match self.get(name)? {
            FieldValue::Null => Some(None),
            FieldValue::Date(d) => Some(Some(*d)),
            _ => None,
        }
    }
}

/// Check a path identifier against the entity's identifier contract.
pub fn validate_id(schema: &EntitySchema, id: &str) -> Result<(), AppError> {
    if schema.id_format.matches(id) {
        Ok(())
    } else {
        tracing::debug!("{}: rejected identifier {:?}", schema.entity, id);
        Err(AppError::Validation(schema.invalid_id_message.to_string()))
    }
}

/// Run a request body through the schema.
///
/// Order: body shape, then missing required fields (all at once, before any
/// type check), then each field's parse rule in declaration order.
pub fn validate(
    schema: &EntitySchema,
    body: &Value,
    mode: Mode,
) -> Result<ValidatedFields, AppError> {
    let Some(object) = body.as_object() else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    for rule in schema.fields.iter().filter(|r| r.required) {
        let missing = match object.get(rule.name) {
            None => mode != Mode::Patch,
            Some(value) => is_blank(value),
        };
        if missing {
            tracing::debug!("{}: missing required field {}", schema.entity, rule.name);
            return Err(AppError::Validation(schema.missing_message.to_string()));
        }
    }

    let mut fields = ValidatedFields::default();
    for rule in schema.fields {
        if let Some(value) = parse_field(rule, object)? {
            fields.values.insert(rule.name, value);
        }
    }

    Ok(fields)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn parse_field(rule: &FieldRule, object: &Map<String, Value>) -> Result<Option<FieldValue>, AppError> {
    let Some(raw) = object.get(rule.name) else {
        return Ok(None);
    };
    if raw.is_null() {
        return Ok(Some(FieldValue::Null));
    }

    let parsed = match rule.kind {
        FieldKind::Text => raw.as_str().map(|s| FieldValue::Text(s.trim().to_string())),
        FieldKind::Number => match raw {
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number),
            _ => None,
        },
        FieldKind::Integer => raw.as_i64().map(FieldValue::Integer),
        FieldKind::Date => raw.as_str().and_then(parse_datetime).map(FieldValue::Date),
        FieldKind::Bool => raw.as_bool().map(FieldValue::Bool),
    };

    match parsed {
        Some(value) => Ok(Some(value)),
        None => {
            tracing::debug!("rejected value for {}: {}", rule.name, raw);
            Err(AppError::Validation(rule.invalid_message.to_string()))
        }
    }
}
