use std::fmt;

use super::expr::{ColumnRef, Expr, Literal};
use crate::schema::{ContainerSchema, ID_COLUMN};
use crate::wire::{Row, SqlStatement};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// A container in a FROM or JOIN clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub name: &'static str,
    pub alias: Option<&'static str>,
}

impl TableRef {
    pub fn new(name: &'static str) -> Self {
        Self { name, alias: None }
    }

    pub fn aliased(name: &'static str, alias: &'static str) -> Self {
        Self {
            name,
            alias: Some(alias),
        }
    }

    /// The qualifier columns of this table are referenced by.
    pub fn qualifier(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias {
            Some(alias) => write!(f, "{} {alias}", self.name),
            None => f.write_str(self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// `[LEFT] JOIN table ON left == right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// One projected output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub column: ColumnRef,
    pub alias: Option<&'static str>,
}

impl SelectItem {
    /// The name this item carries in the result set.
    pub fn output_name(&self) -> &'static str {
        self.alias.unwrap_or(self.column.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*` over the FROM table.
    All,
    Columns(Vec<SelectItem>),
    /// `COUNT(column)`, yielding a single LONG.
    Count(ColumnRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Projection,
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub condition: Option<Expr>,
    pub order_by: Option<(ColumnRef, Order)>,
    pub limit: Option<u64>,
}

impl Select {
    /// `SELECT * FROM table`
    pub fn all_from(table: TableRef) -> Self {
        Self {
            projection: Projection::All,
            from: table,
            joins: Vec::new(),
            condition: None,
            order_by: None,
            limit: None,
        }
    }

    /// `SELECT COUNT(column) FROM table`
    pub fn count(table: TableRef, column: ColumnRef) -> Self {
        Self {
            projection: Projection::Count(column),
            ..Self::all_from(table)
        }
    }

    /// Projects the given columns in order.
    pub fn columns(mut self, items: impl IntoIterator<Item = SelectItem>) -> Self {
        self.projection = Projection::Columns(items.into_iter().collect());
        self
    }

    /// Projects every column of `schema`, qualified by `table`.
    pub fn schema_columns(self, table: &'static str, schema: &ContainerSchema) -> Self {
        self.columns(schema.columns.iter().map(|column| SelectItem {
            column: ColumnRef {
                table: Some(table),
                name: column.name,
            },
            alias: None,
        }))
    }

    /// Appends one projected column with an output alias.
    pub fn with_column(mut self, column: ColumnRef, alias: &'static str) -> Self {
        let item = SelectItem {
            column,
            alias: Some(alias),
        };
        match &mut self.projection {
            Projection::Columns(items) => items.push(item),
            _ => self.projection = Projection::Columns(vec![item]),
        }
        self
    }

    pub fn join(mut self, table: TableRef, left: ColumnRef, right: ColumnRef) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            table,
            left,
            right,
        });
        self
    }

    pub fn left_join(mut self, table: TableRef, left: ColumnRef, right: ColumnRef) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Left,
            table,
            left,
            right,
        });
        self
    }

    pub fn filter(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn order_by(mut self, column: ColumnRef, order: Order) -> Self {
        self.order_by = Some((column, order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// `DELETE FROM table WHERE condition`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: &'static str,
    pub condition: Expr,
}

/// `INSERT INTO table (columns) VALUES (...), (...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Literal>>,
}

impl Insert {
    /// Binds encoded rows of `schema`, one literal per declared column.
    pub fn rows(schema: &ContainerSchema, rows: &[Row]) -> Self {
        Self {
            table: schema.name,
            columns: schema.column_names(),
            rows: rows
                .iter()
                .map(|row| {
                    schema
                        .columns
                        .iter()
                        .zip(row)
                        .map(|(column, value)| Literal::from_value(value, column.column_type))
                        .collect()
                })
                .collect(),
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS` for one container schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTable {
    pub schema: &'static ContainerSchema,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Delete(Delete),
    Insert(Insert),
    CreateTable(CreateTable),
}

impl Statement {
    /// The request envelope carrying this statement's text.
    pub fn to_wire(&self) -> SqlStatement {
        SqlStatement {
            stmt: self.to_string(),
        }
    }
}

impl From<Select> for Statement {
    fn from(select: Select) -> Self {
        Statement::Select(select)
    }
}

impl From<Delete> for Statement {
    fn from(delete: Delete) -> Self {
        Statement::Delete(delete)
    }
}

impl From<Insert> for Statement {
    fn from(insert: Insert) -> Self {
        Statement::Insert(insert)
    }
}

impl From<CreateTable> for Statement {
    fn from(create: CreateTable) -> Self {
        Statement::CreateTable(create)
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias {
            Some(alias) => write!(f, "{} AS {alias}", self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        match &self.projection {
            Projection::All => f.write_str("*")?,
            Projection::Columns(items) => write_list(f, items)?,
            Projection::Count(column) => write!(f, "COUNT({column})")?,
        }
        write!(f, " FROM {}", self.from)?;
        for join in &self.joins {
            let keyword = match join.kind {
                JoinKind::Inner => "JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            write!(
                f,
                " {keyword} {} ON {} == {}",
                join.table, join.left, join.right
            )?;
        }
        if let Some(condition) = &self.condition {
            write!(f, " WHERE {condition}")?;
        }
        if let Some((column, order)) = &self.order_by {
            write!(f, " ORDER BY {column} {}", order.as_str())?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(select) => write!(f, "{select}"),
            Statement::Delete(delete) => {
                write!(f, "DELETE FROM {} WHERE {}", delete.table, delete.condition)
            }
            Statement::Insert(insert) => {
                write!(f, "INSERT INTO {} (", insert.table)?;
                write_list(f, &insert.columns)?;
                f.write_str(") VALUES ")?;
                for (i, row) in insert.rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str("(")?;
                    write_list(f, row)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Statement::CreateTable(create) => {
                write!(f, "CREATE TABLE IF NOT EXISTS {} (", create.schema.name)?;
                for (i, column) in create.schema.columns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", column.name, column.column_type.as_str())?;
                    if column.name == ID_COLUMN {
                        f.write_str(" PRIMARY KEY")?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{OPPORTUNITIES, OPPORTUNITY_REQUIREMENTS, REGISTRATIONS, SKILLS};
    use crate::sql::{col, qualified};

    #[test]
    fn test_select_with_condition_order_and_limit() {
        let stmt = Select::all_from(TableRef::new(SKILLS.name))
            .filter(col("name").eq("First aid"))
            .order_by(col("id"), Order::Asc)
            .limit(1);

        assert_eq!(
            stmt.to_string(),
            "SELECT * FROM VoMaSkills WHERE name == 'First aid' ORDER BY id ASC LIMIT 1"
        );
    }

    #[test]
    fn test_join_renders_aliases() {
        let stmt = Select::all_from(TableRef::aliased(REGISTRATIONS.name, "reg"))
            .schema_columns("reg", &REGISTRATIONS)
            .join(
                TableRef::aliased(OPPORTUNITIES.name, "opp"),
                qualified("reg", "opportunityId"),
                qualified("opp", "id"),
            )
            .filter(qualified("opp", "orgId").eq("org_1"));

        assert_eq!(
            stmt.to_string(),
            "SELECT reg.id, reg.userId, reg.opportunityId, reg.status, reg.registrationTime \
             FROM VoMaRegistrations reg JOIN VoMaOpportunities opp ON reg.opportunityId == opp.id \
             WHERE opp.orgId == 'org_1'"
        );
    }

    #[test]
    fn test_left_join_with_alias_column() {
        let stmt = Select::all_from(TableRef::aliased("VoMaVolunteerSkills", "vs"))
            .columns([SelectItem {
                column: qualified("vs", "id"),
                alias: None,
            }])
            .with_column(qualified("sk", "name"), "skillName")
            .left_join(
                TableRef::aliased(SKILLS.name, "sk"),
                qualified("vs", "skillId"),
                qualified("sk", "id"),
            );

        assert_eq!(
            stmt.to_string(),
            "SELECT vs.id, sk.name AS skillName FROM VoMaVolunteerSkills vs \
             LEFT JOIN VoMaSkills sk ON vs.skillId == sk.id"
        );
    }

    #[test]
    fn test_count() {
        let stmt = Select::count(TableRef::new(REGISTRATIONS.name), col("id"))
            .filter(col("opportunityId").eq("opp_1"));

        assert_eq!(
            stmt.to_string(),
            "SELECT COUNT(id) FROM VoMaRegistrations WHERE opportunityId == 'opp_1'"
        );
    }

    #[test]
    fn test_delete_then_insert_batch() {
        let delete: Statement = Delete {
            table: OPPORTUNITY_REQUIREMENTS.name,
            condition: col("opportunityId").eq("opp_1"),
        }
        .into();
        let insert: Statement = Insert::rows(
            &OPPORTUNITY_REQUIREMENTS,
            &[
                vec![json!("opp_1-sk_1"), json!("opp_1"), json!("sk_1"), json!(true)],
                vec![json!("opp_1-sk_2"), json!("opp_1"), json!("sk_2"), json!(null)],
            ],
        )
        .into();

        assert_eq!(
            delete.to_string(),
            "DELETE FROM VoMaOpportunityRequirements WHERE opportunityId == 'opp_1'"
        );
        assert_eq!(
            insert.to_string(),
            "INSERT INTO VoMaOpportunityRequirements (id, opportunityId, skillId, isMandatory) \
             VALUES ('opp_1-sk_1', 'opp_1', 'sk_1', TRUE), ('opp_1-sk_2', 'opp_1', 'sk_2', NULL)"
        );
    }

    #[test]
    fn test_insert_escapes_text_once() {
        let insert: Statement =
            Insert::rows(&SKILLS, &[vec![json!("sk_1"), json!(r#"O'Brien "the" \helper"#)]]).into();

        assert_eq!(
            insert.to_wire().stmt,
            r#"INSERT INTO VoMaSkills (id, name) VALUES ('sk_1', 'O''Brien "the" \helper')"#
        );
    }

    #[test]
    fn test_create_table() {
        let stmt: Statement = CreateTable { schema: &SKILLS }.into();
        assert_eq!(
            stmt.to_string(),
            "CREATE TABLE IF NOT EXISTS VoMaSkills (id STRING PRIMARY KEY, name STRING)"
        );
    }
}
