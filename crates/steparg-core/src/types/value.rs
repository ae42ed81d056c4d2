//! Dynamically typed step argument values

use super::{RuntimeType, Table};
use chrono::NaiveDateTime;
use serde_json::json;
use std::fmt;
use uuid::Uuid;

/// A member of an enumeration type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub member: String,
    pub ordinal: usize,
}

/// An instance of a user-domain type, usually produced by a transformation
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub type_name: String,
    pub data: serde_json::Value,
}

/// A step argument value
///
/// Step text arrives as [`Value::String`], data tables as [`Value::Table`];
/// every other variant is the result of a conversion. `Null` is the
/// "no value" representation of optional types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    Enum(EnumValue),
    Table(Table),
    Object(ObjectValue),
}

impl Value {
    pub fn object(type_name: impl Into<String>, data: serde_json::Value) -> Self {
        Value::Object(ObjectValue {
            type_name: type_name.into(),
            data,
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of plain values; `None` for `Null`, enums and objects
    /// since those need their declaring type to be described
    pub fn scalar_type(&self) -> Option<RuntimeType> {
        let ty = match self {
            Value::Null | Value::Enum(_) | Value::Object(_) => return None,
            Value::Bool(_) => RuntimeType::Bool,
            Value::Char(_) => RuntimeType::Char,
            Value::String(_) => RuntimeType::String,
            Value::I8(_) => RuntimeType::I8,
            Value::I16(_) => RuntimeType::I16,
            Value::I32(_) => RuntimeType::I32,
            Value::I64(_) => RuntimeType::I64,
            Value::U8(_) => RuntimeType::U8,
            Value::U16(_) => RuntimeType::U16,
            Value::U32(_) => RuntimeType::U32,
            Value::U64(_) => RuntimeType::U64,
            Value::F32(_) => RuntimeType::F32,
            Value::F64(_) => RuntimeType::F64,
            Value::Guid(_) => RuntimeType::Guid,
            Value::DateTime(_) => RuntimeType::DateTime,
            Value::Table(_) => RuntimeType::Table,
        };
        Some(ty)
    }

    /// Name of the value's runtime type, for diagnostics
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Enum(v) => v.type_name.clone(),
            Value::Object(v) => v.type_name.clone(),
            other => other
                .scalar_type()
                .map(|ty| ty.to_string())
                .unwrap_or_default(),
        }
    }

    /// JSON rendering used by reports and the command line
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Char(c) => json!(c.to_string()),
            Value::String(s) => json!(s),
            Value::I8(n) => json!(n),
            Value::I16(n) => json!(n),
            Value::I32(n) => json!(n),
            Value::I64(n) => json!(n),
            Value::U8(n) => json!(n),
            Value::U16(n) => json!(n),
            Value::U32(n) => json!(n),
            Value::U64(n) => json!(n),
            Value::F32(n) => json!(n),
            Value::F64(n) => json!(n),
            Value::Guid(g) => json!(g.to_string()),
            Value::DateTime(d) => json!(d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::Enum(v) => json!(v.member),
            Value::Table(t) => t.to_json(),
            Value::Object(v) => v.data.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::I8(n) => write!(f, "{}", n),
            Value::I16(n) => write!(f, "{}", n),
            Value::I32(n) => write!(f, "{}", n),
            Value::I64(n) => write!(f, "{}", n),
            Value::U8(n) => write!(f, "{}", n),
            Value::U16(n) => write!(f, "{}", n),
            Value::U32(n) => write!(f, "{}", n),
            Value::U64(n) => write!(f, "{}", n),
            Value::F32(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{}", n),
            Value::Guid(g) => write!(f, "{}", g),
            Value::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Value::Enum(v) => write!(f, "{}", v.member),
            Value::Table(t) => write!(f, "{}", t),
            Value::Object(v) => write!(f, "{} {}", v.type_name, v.data),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::I32(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::I64(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::F64(n)
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Value::Guid(g)
    }
}
