//! Evaluation of statement trees against in-memory tables.

use std::cmp::Ordering;

use serde_json::Value;
use volmatch_core::sql::{ColumnRef, Expr, JoinKind, Literal, Order, Projection, Select};
use volmatch_core::storage::{Result, StoreError};
use volmatch_core::wire::{ColumnInfo, QueryResult, Row};

use super::store::Table;

/// One table's contribution to a (possibly joined) row.
#[derive(Clone, Copy)]
struct Bound<'a> {
    qualifier: &'a str,
    table: &'a Table,
    row: Option<&'a Row>,
}

/// A row in flight through FROM/JOIN/WHERE.
type Scope<'a> = Vec<Bound<'a>>;

fn unknown_column(column: &ColumnRef) -> StoreError {
    StoreError::Fault {
        status: Some(400),
        body: format!("unknown column {column}"),
    }
}

fn resolve<'a>(scope: &[Bound<'a>], column: &ColumnRef) -> Result<&'a Value> {
    static NULL: Value = Value::Null;

    let bound = scope
        .iter()
        .find(|bound| match column.table {
            Some(qualifier) => bound.qualifier == qualifier,
            None => bound.table.position(column.name).is_some(),
        })
        .ok_or_else(|| unknown_column(column))?;
    let position = bound
        .table
        .position(column.name)
        .ok_or_else(|| unknown_column(column))?;

    Ok(bound
        .row
        .and_then(|row| row.get(position))
        .unwrap_or(&NULL))
}

fn matches_literal(value: &Value, literal: &Literal) -> bool {
    match literal {
        Literal::Null => value.is_null(),
        other => !value.is_null() && *value == other.to_value(),
    }
}

fn eval<'a>(scope: &[Bound<'a>], expr: &Expr) -> Result<bool> {
    match expr {
        Expr::Eq(column, literal) => Ok(matches_literal(resolve(scope, column)?, literal)),
        Expr::In(column, literals) => {
            let value = resolve(scope, column)?;
            Ok(literals.iter().any(|literal| matches_literal(value, literal)))
        }
        Expr::And(terms) => {
            for term in terms {
                if !eval(scope, term)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

/// Total order used for ORDER BY and row-read sorting. NULL sorts first.
pub(super) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Applies an optional condition to the rows of a single table.
pub(super) fn filter_rows<'a>(
    table: &'a Table,
    qualifier: &'a str,
    condition: Option<&Expr>,
) -> Result<Vec<&'a Row>> {
    let mut selected = Vec::new();
    for row in table.rows() {
        let scope = [Bound {
            qualifier,
            table,
            row: Some(row),
        }];
        if condition.map_or(Ok(true), |expr| eval(&scope, expr))? {
            selected.push(row);
        }
    }
    Ok(selected)
}

/// Runs a SELECT. `lookup` resolves a container name to its table.
pub(super) fn run_select<'a>(
    select: &Select,
    lookup: impl Fn(&str) -> Result<&'a Table>,
) -> Result<QueryResult> {
    let from = lookup(select.from.name)?;
    let mut scopes: Vec<Scope<'a>> = from
        .rows()
        .map(|row| {
            vec![Bound {
                qualifier: select.from.qualifier(),
                table: from,
                row: Some(row),
            }]
        })
        .collect();

    for join in &select.joins {
        let joined = lookup(join.table.name)?;
        let mut next = Vec::new();
        for scope in scopes {
            let mut matched = false;
            for row in joined.rows() {
                let mut candidate = scope.clone();
                candidate.push(Bound {
                    qualifier: join.table.qualifier(),
                    table: joined,
                    row: Some(row),
                });
                let left = resolve(&candidate, &join.left)?;
                let right = resolve(&candidate, &join.right)?;
                if !left.is_null() && left == right {
                    matched = true;
                    next.push(candidate);
                }
            }
            if !matched && join.kind == JoinKind::Left {
                let mut candidate = scope;
                candidate.push(Bound {
                    qualifier: join.table.qualifier(),
                    table: joined,
                    row: None,
                });
                next.push(candidate);
            }
        }
        scopes = next;
    }

    if let Some(condition) = &select.condition {
        let mut kept = Vec::with_capacity(scopes.len());
        for scope in scopes {
            if eval(&scope, condition)? {
                kept.push(scope);
            }
        }
        scopes = kept;
    }

    if let Some((column, order)) = &select.order_by {
        let mut keyed = Vec::with_capacity(scopes.len());
        for scope in scopes {
            let key = resolve(&scope, column)?.clone();
            keyed.push((key, scope));
        }
        keyed.sort_by(|(a, _), (b, _)| match order {
            Order::Asc => compare_values(a, b),
            Order::Desc => compare_values(b, a),
        });
        scopes = keyed.into_iter().map(|(_, scope)| scope).collect();
    }

    if let Some(limit) = select.limit {
        scopes.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    match &select.projection {
        Projection::Count(_) => Ok(QueryResult {
            columns: vec![ColumnInfo {
                name: String::new(),
                column_type: "LONG".to_string(),
            }],
            results: vec![vec![Value::from(scopes.len() as i64)]],
        }),
        Projection::All => Ok(QueryResult {
            columns: from.column_info(),
            results: scopes
                .iter()
                .map(|scope| scope[0].row.cloned().unwrap_or_default())
                .collect(),
        }),
        Projection::Columns(items) => {
            let columns = items
                .iter()
                .map(|item| ColumnInfo {
                    name: item.output_name().to_string(),
                    column_type: String::new(),
                })
                .collect();
            let mut results = Vec::with_capacity(scopes.len());
            for scope in &scopes {
                let mut row = Vec::with_capacity(items.len());
                for item in items {
                    row.push(resolve(scope, &item.column)?.clone());
                }
                results.push(row);
            }
            Ok(QueryResult { columns, results })
        }
    }
}
