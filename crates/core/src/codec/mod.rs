//! Row codec.
//!
//! Typed records are encoded by column name into a [`FieldMap`] and only
//! turned into a positional row at the wire boundary, using the entity's one
//! declared [`ContainerSchema`]. Decoding goes the other way through a
//! [`RowView`], with each field decoded independently; the aggregated
//! [`Decoded`] outcome lets the caller pick a [`DecodePolicy`].

mod entities;
mod error;
mod fields;
mod timestamp;

pub use error::{CodecError, DecodePolicy, FieldError, FieldFault};
pub use fields::{FieldMap, FieldReader, RowView};
pub use timestamp::{format_timestamp, parse_timestamp};

use serde_json::Value;

use crate::ids;
use crate::schema::ContainerSchema;
use crate::wire::Row;

/// A record stored in exactly one container.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in errors and logs.
    const ENTITY_TYPE: &'static str;

    /// Prefix of generated ids, e.g. `usr_`.
    const ID_PREFIX: &'static str;

    fn schema() -> &'static ContainerSchema;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// An id derived from the record's own fields, used instead of a
    /// generated one when the id is unassigned.
    fn derived_id(&self) -> Option<String> {
        None
    }

    fn encode(&self) -> FieldMap;

    fn decode(fields: &mut FieldReader<'_>) -> Self;

    /// Fills in the id if it is unassigned and returns it.
    fn assign_id(&mut self) -> String {
        if ids::is_unassigned(self.id()) {
            let id = self
                .derived_id()
                .unwrap_or_else(|| ids::next_id(Self::ID_PREFIX));
            self.set_id(id);
        }
        self.id().to_string()
    }
}

/// Encodes a record into its positional wire row.
pub fn encode_row<E: Entity>(record: &E) -> Result<Row, CodecError> {
    let schema = E::schema();
    let fields = record.encode();

    if let Some(column) = fields.columns().find(|name| schema.column(name).is_none()) {
        return Err(CodecError::UnknownColumn {
            entity_type: E::ENTITY_TYPE,
            container: schema.name,
            column,
        });
    }

    Ok(schema
        .columns
        .iter()
        .map(|column| fields.get(column.name).cloned().unwrap_or(Value::Null))
        .collect())
}

/// A decoded record plus every field that failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<E> {
    pub record: E,
    pub errors: Vec<FieldError>,
}

impl<E: Entity> Decoded<E> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Applies `policy` to the field failures, if any.
    pub fn into_result(self, policy: DecodePolicy) -> Result<E, CodecError> {
        if self.errors.is_empty() {
            return Ok(self.record);
        }
        match policy {
            DecodePolicy::Lenient => {
                for error in &self.errors {
                    tracing::warn!(
                        entity_type = E::ENTITY_TYPE,
                        id = %self.record.id(),
                        column = error.column,
                        fault = %error.fault,
                        "Field decode failed; value left unset"
                    );
                }
                Ok(self.record)
            }
            DecodePolicy::Strict => Err(CodecError::Decode {
                entity_type: E::ENTITY_TYPE,
                errors: self.errors,
            }),
        }
    }
}

/// Decodes one row through a name-addressed view.
pub fn decode_view<E: Entity>(view: RowView<'_>) -> Decoded<E> {
    let mut reader = FieldReader::new(view);
    let record = E::decode(&mut reader);
    Decoded {
        record,
        errors: reader.into_errors(),
    }
}

/// Decodes a positional row laid out in the entity's schema order.
pub fn decode_row<E: Entity>(row: &[Value]) -> Result<Decoded<E>, CodecError> {
    let schema = E::schema();
    if row.len() != schema.columns.len() {
        return Err(CodecError::RowLength {
            entity_type: E::ENTITY_TYPE,
            expected: schema.columns.len(),
            actual: row.len(),
        });
    }
    Ok(decode_view(RowView::positional(schema, row)))
}
