//! SQL statement builder.
//!
//! Statements are built as an expression tree with bound [`Literal`]s and
//! rendered to text through `Display`. Escaping happens in exactly one place,
//! [`quote_literal`]. The same [`Expr`] type doubles as the row-read
//! condition of the store's row API.

mod expr;
mod statement;

pub use expr::{col, qualified, quote_literal, ColumnRef, Expr, Literal};
pub use statement::{
    CreateTable, Delete, Insert, Join, JoinKind, Order, Projection, Select, SelectItem, Statement,
    TableRef,
};
