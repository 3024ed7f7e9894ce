//! Schema type definitions
//!
//! Collections declare their scalar fields and their relations. The schema
//! is built in code by the embedder and consulted by query validation and
//! relation resolution. Supported scalar types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - timestamp: RFC 3339 UTC instant, stored as a string

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};

/// Supported scalar field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// RFC 3339 UTC instant (string-encoded, sorts chronologically)
    Timestamp,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Timestamp => "timestamp",
        }
    }

    /// Returns true if string operators (contains/startswith/endswith)
    /// apply to this type
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Timestamp)
    }

    /// Returns true if ordering operators (gt/gte/lt/lte) apply to this type
    pub fn is_ordered(&self) -> bool {
        !matches!(self, FieldType::Bool)
    }
}

/// Scalar field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    pub field_type: FieldType,
    /// Whether the field must be present and non-null
    pub required: bool,
}

impl FieldDef {
    /// Create a required string field
    pub fn required_string() -> Self {
        Self {
            field_type: FieldType::String,
            required: true,
        }
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self {
            field_type: FieldType::String,
            required: false,
        }
    }

    /// Create a required int field
    pub fn required_int() -> Self {
        Self {
            field_type: FieldType::Int,
            required: true,
        }
    }

    /// Create an optional int field
    pub fn optional_int() -> Self {
        Self {
            field_type: FieldType::Int,
            required: false,
        }
    }

    /// Create a required bool field
    pub fn required_bool() -> Self {
        Self {
            field_type: FieldType::Bool,
            required: true,
        }
    }

    /// Create a required float field
    pub fn required_float() -> Self {
        Self {
            field_type: FieldType::Float,
            required: true,
        }
    }

    /// Create a required timestamp field
    pub fn required_timestamp() -> Self {
        Self {
            field_type: FieldType::Timestamp,
            required: true,
        }
    }

    /// Create an optional timestamp field
    pub fn optional_timestamp() -> Self {
        Self {
            field_type: FieldType::Timestamp,
            required: false,
        }
    }
}

/// Cardinality of a relation as seen from the declaring collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Zero or one related record
    ToOne,
    /// Zero or more related records
    ToMany,
}

/// Relation definition
///
/// The foreign key always lives on the target collection and references the
/// declaring record's primary id. A `ToOne` relation whose target holds more
/// than one matching record resolves to the first in retrieval order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Relation field name on the declaring collection
    pub name: String,
    /// Cardinality
    pub kind: RelationKind,
    /// Target collection name
    pub target: String,
    /// Field on the target collection referencing the parent id
    pub foreign_key: String,
}

impl RelationDef {
    /// Create a to-one relation
    pub fn to_one(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::ToOne,
            target: target.into(),
            foreign_key: foreign_key.into(),
        }
    }

    /// Create a to-many relation
    pub fn to_many(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::ToMany,
            target: target.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

/// A collection's declared fields and relations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionDef {
    /// Scalar fields by name
    fields: BTreeMap<String, FieldDef>,
    /// Relations by name
    relations: BTreeMap<String, RelationDef>,
}

impl CollectionDef {
    /// Creates an empty collection definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a scalar field (builder style)
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Declares a relation (builder style)
    #[must_use]
    pub fn relation(mut self, def: RelationDef) -> Self {
        self.relations.insert(def.name.clone(), def);
        self
    }

    /// Looks up a scalar field definition
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Looks up a relation definition
    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    /// Returns true if the name is declared as either a field or a relation
    pub fn declares(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.relations.contains_key(name)
    }
}

/// Registry of collection definitions
#[derive(Debug, Clone, Default)]
pub struct Schema {
    collections: BTreeMap<String, CollectionDef>,
}

impl Schema {
    /// Creates an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateCollection` if the name is already
    /// registered.
    pub fn register(&mut self, name: impl Into<String>, def: CollectionDef) -> SchemaResult<()> {
        let name = name.into();
        if self.collections.contains_key(&name) {
            return Err(SchemaError::DuplicateCollection(name));
        }
        self.collections.insert(name, def);
        Ok(())
    }

    /// Looks up a collection definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownCollection` if not registered.
    pub fn collection(&self, name: &str) -> SchemaResult<&CollectionDef> {
        self.collections
            .get(name)
            .ok_or_else(|| SchemaError::UnknownCollection(name.to_string()))
    }
}
