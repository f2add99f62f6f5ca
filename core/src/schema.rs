//! Static field schemas.
//!
//! Every entity type declares its fields once as a `&'static [FieldSchema]`:
//! the JSON name, the value kind, an optional default and whether the field is
//! deprecated. Deprecated fields are accepted on input but never serialized.

use serde_json::{Map, Value};

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Integer,
    /// Integer or fractional JSON number, kept in the form received.
    Number,
    Boolean,
    /// RFC 3339 timestamp, kept as written.
    DateTime,
    /// Free-form JSON object.
    Object,
    StringList,
    /// A nested entity, described by its own schema.
    Entity(fn() -> &'static [FieldSchema]),
    /// An ordered list of nested entities.
    EntityList(fn() -> &'static [FieldSchema]),
}

/// Value a field takes when an entity is built from defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    None,
    Bool(bool),
    Int(i64),
    Str(&'static str),
    EmptyList,
}

impl FieldDefault {
    pub fn to_value(self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Bool(b) => Some(Value::Bool(b)),
            FieldDefault::Int(n) => Some(Value::from(n)),
            FieldDefault::Str(s) => Some(Value::from(s)),
            FieldDefault::EmptyList => Some(Value::Array(Vec::new())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    pub deprecated: bool,
}

impl FieldSchema {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: FieldDefault::None,
            deprecated: false,
        }
    }

    pub const fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    pub const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// Look up a field by its JSON name.
pub fn field<'a>(schema: &'a [FieldSchema], name: &str) -> Option<&'a FieldSchema> {
    schema.iter().find(|f| f.name == name)
}

/// Object holding every declared default.
pub fn defaults(schema: &[FieldSchema]) -> Map<String, Value> {
    schema
        .iter()
        .filter_map(|f| f.default.to_value().map(|v| (f.name.to_string(), v)))
        .collect()
}

/// Remove deprecated fields from serialized entity data.
pub fn strip_deprecated(schema: &[FieldSchema], data: &mut Map<String, Value>) {
    for f in schema.iter().filter(|f| f.deprecated) {
        data.remove(f.name);
    }
}
