use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::{FieldError, FieldFault};
use super::timestamp::{format_timestamp, parse_timestamp};
use crate::domain::EnumLiteral;
use crate::schema::ContainerSchema;

/// Column values of one record, keyed by column name.
///
/// Encoders fill this by name; [`super::encode_row`] lays it out in the
/// schema's column order. Columns never set encode as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    values: BTreeMap<&'static str, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(mut self, column: &'static str, value: &str) -> Self {
        self.values.insert(column, Value::String(value.to_string()));
        self
    }

    pub fn opt_string(mut self, column: &'static str, value: Option<&str>) -> Self {
        self.values.insert(
            column,
            value.map_or(Value::Null, |v| Value::String(v.to_string())),
        );
        self
    }

    pub fn long(mut self, column: &'static str, value: Option<i64>) -> Self {
        self.values.insert(column, value.map_or(Value::Null, Value::from));
        self
    }

    pub fn bool(mut self, column: &'static str, value: Option<bool>) -> Self {
        self.values.insert(column, value.map_or(Value::Null, Value::Bool));
        self
    }

    pub fn timestamp(mut self, column: &'static str, value: Option<&DateTime<Utc>>) -> Self {
        self.values.insert(
            column,
            value.map_or(Value::Null, |ts| Value::String(format_timestamp(ts))),
        );
        self
    }

    pub fn enumeration<T: EnumLiteral>(mut self, column: &'static str, value: Option<T>) -> Self {
        self.values.insert(
            column,
            value.map_or(Value::Null, |v| Value::String(v.as_str().to_string())),
        );
        self
    }

    pub(crate) fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

/// Name-addressed view over one positional row.
#[derive(Debug, Clone)]
pub struct RowView<'a> {
    names: Vec<&'a str>,
    values: &'a [Value],
}

impl<'a> RowView<'a> {
    /// A row read by the row API, laid out in `schema` order.
    pub fn positional(schema: &'a ContainerSchema, values: &'a [Value]) -> Self {
        Self {
            names: schema.columns.iter().map(|column| column.name).collect(),
            values,
        }
    }

    /// A SQL result row whose layout is given by the result's column names.
    pub fn named(names: Vec<&'a str>, values: &'a [Value]) -> Self {
        Self { names, values }
    }

    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.names
            .iter()
            .position(|name| *name == column)
            .and_then(|index| self.values.get(index))
    }
}

/// Reads typed fields out of a [`RowView`], collecting per-field failures.
///
/// Every accessor is independent: a failed field yields `None` (or an empty
/// string for required text) and records a [`FieldError`], leaving the rest
/// of the row readable. A `null` optional value is not a failure.
#[derive(Debug)]
pub struct FieldReader<'a> {
    row: RowView<'a>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(row: RowView<'a>) -> Self {
        Self {
            row,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, column: &'static str, fault: FieldFault) {
        self.errors.push(FieldError { column, fault });
    }

    fn value(&mut self, column: &'static str) -> Option<&'a Value> {
        let value = self.row.get(column);
        if value.is_none() {
            self.fail(column, FieldFault::Missing);
        }
        value
    }

    /// A required text column.
    pub fn string(&mut self, column: &'static str) -> String {
        match self.value(column) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) => {
                self.fail(column, FieldFault::Null);
                String::new()
            }
            Some(other) => {
                self.fail(column, FieldFault::WrongType { expected: "string" });
                other.to_string()
            }
            None => String::new(),
        }
    }

    pub fn opt_string(&mut self, column: &'static str) -> Option<String> {
        match self.value(column)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            _ => {
                self.fail(column, FieldFault::WrongType { expected: "string" });
                None
            }
        }
    }

    /// A text column only some reads project, such as a joined name.
    /// Absence is not a failure.
    pub fn projected_string(&mut self, column: &'static str) -> Option<String> {
        match self.row.get(column)? {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn long(&mut self, column: &'static str) -> Option<i64> {
        match self.value(column)? {
            Value::Number(n) => {
                let long = n.as_i64();
                if long.is_none() {
                    self.fail(column, FieldFault::WrongType { expected: "integer" });
                }
                long
            }
            Value::Null => None,
            _ => {
                self.fail(column, FieldFault::WrongType { expected: "integer" });
                None
            }
        }
    }

    pub fn bool(&mut self, column: &'static str) -> Option<bool> {
        match self.value(column)? {
            Value::Bool(b) => Some(*b),
            Value::Null => None,
            _ => {
                self.fail(column, FieldFault::WrongType { expected: "boolean" });
                None
            }
        }
    }

    pub fn timestamp(&mut self, column: &'static str) -> Option<DateTime<Utc>> {
        match self.value(column)? {
            Value::String(s) => {
                let ts = parse_timestamp(s);
                if ts.is_none() {
                    self.fail(column, FieldFault::BadTimestamp(s.clone()));
                }
                ts
            }
            Value::Null => None,
            _ => {
                self.fail(column, FieldFault::WrongType { expected: "timestamp string" });
                None
            }
        }
    }

    pub fn enumeration<T: EnumLiteral>(&mut self, column: &'static str) -> Option<T> {
        match self.value(column)? {
            Value::String(s) => {
                let variant = T::from_literal(s);
                if variant.is_none() {
                    self.fail(column, FieldFault::UnknownLiteral(s.clone()));
                }
                variant
            }
            Value::Null => None,
            _ => {
                self.fail(column, FieldFault::WrongType { expected: "string" });
                None
            }
        }
    }

    pub(crate) fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}
