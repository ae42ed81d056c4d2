//! Type descriptors for step argument conversion
//!
//! A conversion request names its destination with a [`BindingType`]. Most
//! descriptors wrap a concrete [`RuntimeType`]; a [`BindingType::Named`]
//! descriptor only carries a type name and cannot take part in primitive
//! conversion.

pub mod table;
pub mod value;

pub use table::{Table, TableRow};
pub use value::{EnumValue, ObjectValue, Value};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Destination type of a conversion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// A concrete runtime type
    Runtime(RuntimeType),
    /// A type known only by name
    Named(String),
}

impl BindingType {
    /// Exact, value-based type equality
    pub fn type_equals(&self, other: &BindingType) -> bool {
        self == other
    }

    /// The runtime type behind this descriptor, if any
    pub fn as_runtime(&self) -> Option<&RuntimeType> {
        match self {
            BindingType::Runtime(ty) => Some(ty),
            BindingType::Named(_) => None,
        }
    }

    /// Full name used for table detection and diagnostics
    pub fn full_name(&self) -> String {
        self.to_string()
    }

    /// Whether `value` is an instance of this descriptor's runtime type
    pub fn is_instance(&self, value: &Value) -> bool {
        self.as_runtime().is_some_and(|ty| ty.is_instance(value))
    }
}

impl From<RuntimeType> for BindingType {
    fn from(ty: RuntimeType) -> Self {
        BindingType::Runtime(ty)
    }
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingType::Runtime(ty) => write!(f, "{}", ty),
            BindingType::Named(name) => write!(f, "{}", name),
        }
    }
}

/// An enumeration type: a name and its ordered member names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the value for the member at `ordinal`
    pub fn value_at(&self, ordinal: usize) -> Option<Value> {
        self.members.get(ordinal).map(|member| {
            Value::Enum(EnumValue {
                type_name: self.name.clone(),
                member: member.clone(),
                ordinal,
            })
        })
    }
}

/// Concrete runtime types a step argument can be converted to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    Bool,
    Char,
    String,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Guid,
    DateTime,
    Enum(EnumType),
    Table,
    /// A user-domain type produced by transformations
    Object(String),
    /// Optional value of the inner type
    Nullable(Box<RuntimeType>),
}

impl RuntimeType {
    pub fn nullable(inner: RuntimeType) -> Self {
        RuntimeType::Nullable(Box::new(inner))
    }

    /// Resolve a built-in type name such as `i32`, `bool` or `guid?`
    pub fn builtin(name: &str) -> Option<RuntimeType> {
        let name = name.trim();
        if let Some(inner) = name.strip_suffix('?') {
            return Self::builtin(inner).map(Self::nullable);
        }
        let ty = match name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => RuntimeType::Bool,
            "char" => RuntimeType::Char,
            "string" | "str" => RuntimeType::String,
            "i8" | "sbyte" => RuntimeType::I8,
            "i16" | "short" => RuntimeType::I16,
            "i32" | "int" => RuntimeType::I32,
            "i64" | "long" => RuntimeType::I64,
            "u8" | "byte" => RuntimeType::U8,
            "u16" | "ushort" => RuntimeType::U16,
            "u32" | "uint" => RuntimeType::U32,
            "u64" | "ulong" => RuntimeType::U64,
            "f32" | "float" => RuntimeType::F32,
            "f64" | "double" => RuntimeType::F64,
            "guid" | "uuid" => RuntimeType::Guid,
            "datetime" => RuntimeType::DateTime,
            "table" => RuntimeType::Table,
            _ => return None,
        };
        Some(ty)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            RuntimeType::I8
                | RuntimeType::I16
                | RuntimeType::I32
                | RuntimeType::I64
                | RuntimeType::U8
                | RuntimeType::U16
                | RuntimeType::U32
                | RuntimeType::U64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, RuntimeType::F32 | RuntimeType::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Whether `Null` is a legal value of this type
    pub fn accepts_null(&self) -> bool {
        matches!(
            self,
            RuntimeType::Nullable(_) | RuntimeType::Object(_) | RuntimeType::String
        )
    }

    /// Direct instance-of check
    pub fn is_instance(&self, value: &Value) -> bool {
        match (self, value) {
            (RuntimeType::Nullable(_), Value::Null) => true,
            (RuntimeType::Nullable(inner), value) => inner.is_instance(value),
            (RuntimeType::Enum(ty), Value::Enum(v)) => ty.name == v.type_name,
            (RuntimeType::Object(name), Value::Object(v)) => *name == v.type_name,
            (_, Value::Null) => false,
            (ty, value) => value.scalar_type().as_ref() == Some(ty),
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeType::Bool => "bool",
            RuntimeType::Char => "char",
            RuntimeType::String => "String",
            RuntimeType::I8 => "i8",
            RuntimeType::I16 => "i16",
            RuntimeType::I32 => "i32",
            RuntimeType::I64 => "i64",
            RuntimeType::U8 => "u8",
            RuntimeType::U16 => "u16",
            RuntimeType::U32 => "u32",
            RuntimeType::U64 => "u64",
            RuntimeType::F32 => "f32",
            RuntimeType::F64 => "f64",
            RuntimeType::Guid => "Guid",
            RuntimeType::DateTime => "DateTime",
            RuntimeType::Table => "Table",
            RuntimeType::Enum(ty) => return write!(f, "{}", ty.name),
            RuntimeType::Object(name) => return write!(f, "{}", name),
            RuntimeType::Nullable(inner) => return write!(f, "{}?", inner),
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> EnumType {
        EnumType::new("Color", ["Red", "Green", "Blue"])
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(RuntimeType::builtin("i32"), Some(RuntimeType::I32));
        assert_eq!(RuntimeType::builtin("Int"), Some(RuntimeType::I32));
        assert_eq!(
            RuntimeType::builtin("guid?"),
            Some(RuntimeType::nullable(RuntimeType::Guid))
        );
        assert_eq!(RuntimeType::builtin("Money"), None);
    }

    #[test]
    fn test_display_round_trips_builtin_names() {
        for name in ["bool", "i64", "u8", "f64", "Guid", "Guid?", "DateTime", "Table"] {
            let ty = RuntimeType::builtin(name).unwrap();
            assert_eq!(ty.to_string(), name);
        }
    }

    #[test]
    fn test_instance_checks() {
        assert!(RuntimeType::I32.is_instance(&Value::I32(1)));
        assert!(!RuntimeType::I64.is_instance(&Value::I32(1)));
        assert!(RuntimeType::String.is_instance(&Value::from("x")));

        let nullable = RuntimeType::nullable(RuntimeType::Guid);
        assert!(nullable.is_instance(&Value::Null));
        assert!(nullable.is_instance(&Value::Guid(uuid::Uuid::nil())));
        assert!(!RuntimeType::Guid.is_instance(&Value::Null));

        let green = color().value_at(1).unwrap();
        assert!(RuntimeType::Enum(color()).is_instance(&green));
        assert!(!RuntimeType::Enum(EnumType::new("Shade", ["Green"])).is_instance(&green));
    }

    #[test]
    fn test_named_descriptor_is_never_instance() {
        let named = BindingType::Named("i32".to_string());
        assert!(named.as_runtime().is_none());
        assert!(!named.is_instance(&Value::I32(3)));
        assert_ne!(named, BindingType::Runtime(RuntimeType::I32));
    }
}
