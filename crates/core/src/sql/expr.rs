use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec::{format_timestamp, parse_timestamp};
use crate::schema::ColumnType;

/// Wraps `value` in single quotes, doubling any embedded single quote.
///
/// This is the only place text is escaped for the store's condition and SQL
/// grammar. Backslashes and double quotes carry no special meaning inside a
/// single-quoted literal and pass through untouched.
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push('\'');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

/// A column, optionally qualified by a table alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: Option<&'static str>,
    pub name: &'static str,
}

/// An unqualified column reference.
pub fn col(name: &'static str) -> ColumnRef {
    ColumnRef { table: None, name }
}

/// A column qualified by a table alias, e.g. `reg.status`.
pub fn qualified(table: &'static str, name: &'static str) -> ColumnRef {
    ColumnRef {
        table: Some(table),
        name,
    }
}

impl ColumnRef {
    /// `self == value`
    pub fn eq(self, value: impl Into<Literal>) -> Expr {
        Expr::Eq(self, value.into())
    }

    /// `self IN (values...)`
    pub fn in_list<I, L>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Expr::In(self, values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table {
            Some(table) => write!(f, "{table}.{}", self.name),
            None => f.write_str(self.name),
        }
    }
}

/// A bound value. Rendering turns it into escaped literal text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Long(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Literal {
    /// Binds a wire value stored in a column of `column_type`.
    pub fn from_value(value: &Value, column_type: ColumnType) -> Self {
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(long) => Literal::Long(long),
                None => Literal::Text(n.to_string()),
            },
            Value::String(s) if column_type == ColumnType::Timestamp => match parse_timestamp(s) {
                Some(ts) => Literal::Timestamp(ts),
                None => Literal::Text(s.clone()),
            },
            Value::String(s) => Literal::Text(s.clone()),
            other => Literal::Text(other.to_string()),
        }
    }

    /// The wire value this literal stands for.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Long(n) => Value::from(*n),
            Literal::Text(s) => Value::String(s.clone()),
            Literal::Timestamp(ts) => Value::String(format_timestamp(ts)),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Bool(true) => f.write_str("TRUE"),
            Literal::Bool(false) => f.write_str("FALSE"),
            Literal::Long(n) => write!(f, "{n}"),
            Literal::Text(s) => f.write_str(&quote_literal(s)),
            Literal::Timestamp(ts) => write!(f, "TIMESTAMP({})", quote_literal(&format_timestamp(ts))),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl From<&String> for Literal {
    fn from(value: &String) -> Self {
        Literal::Text(value.clone())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Literal::Timestamp(value)
    }
}

/// A predicate over the columns of one row (or one joined row).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Eq(ColumnRef, Literal),
    In(ColumnRef, Vec<Literal>),
    And(Vec<Expr>),
}

impl Expr {
    /// Conjunction, flattening nested `And`s on the left.
    pub fn and(self, other: Expr) -> Expr {
        match self {
            Expr::And(mut terms) => {
                terms.push(other);
                Expr::And(terms)
            }
            first => Expr::And(vec![first, other]),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Eq(column, Literal::Null) => write!(f, "{column} IS NULL"),
            Expr::Eq(column, value) => write!(f, "{column} == {value}"),
            // An empty IN list is not valid syntax; it matches nothing.
            Expr::In(_, values) if values.is_empty() => f.write_str("FALSE"),
            Expr::In(column, values) => {
                write!(f, "{column} IN (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Expr::And(terms) if terms.is_empty() => f.write_str("TRUE"),
            Expr::And(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    match term {
                        Expr::And(_) => write!(f, "({term})")?,
                        _ => write!(f, "{term}")?,
                    }
                }
                Ok(())
            }
        }
    }
}
