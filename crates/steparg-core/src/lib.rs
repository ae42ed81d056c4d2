//! Steparg Core - Step argument conversion for behaviour-driven test runners
//!
//! This crate turns the raw arguments a step captures (a regex group from
//! the step text, or a data table) into values of the types step handlers
//! declare, so generated test code can call strongly-typed handlers.
//!
//! # Main Components
//!
//! - **Error Handling**: Conversion misses and contract violations using `thiserror`
//! - **Types**: Target type descriptors, dynamic values and data tables
//! - **Bindings**: User-registered step argument transformations
//! - **Conversion Engine**: Transformation resolution with primitive fallback
//! - **Locale**: Culture conventions for number and date parsing
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use steparg_core::{
//!     InMemoryBindingRegistry, Locale, Result, RuntimeType, StepArgumentConverter,
//!     StepArgumentTypeConverter, StepTransformationBuilder, Value,
//! };
//!
//! fn example() -> Result<()> {
//!     let days = StepTransformationBuilder::new("days", RuntimeType::I64)
//!         .regex(r"(\d+) days?")
//!         .parameter("count", RuntimeType::I64)
//!         .handler(|args| match args {
//!             [Value::I64(n)] => Ok(Value::I64(n * 24)),
//!             _ => anyhow::bail!("expected one count"),
//!         })
//!         .build()?;
//!
//!     let registry = InMemoryBindingRegistry::new().with_transformation(days);
//!     let converter = StepArgumentTypeConverter::with_registry(Arc::new(registry));
//!
//!     let hours = converter.convert(
//!         Some(&Value::from("2 days")),
//!         &RuntimeType::I64.into(),
//!         &Locale::invariant(),
//!     )?;
//!     assert_eq!(hours, Value::I64(48));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod bindings;
pub mod conversion;
pub mod error;
pub mod locale;
pub mod tracer;
pub mod types;

// Re-export main types for convenience
pub use bindings::{
    BindingInvoker, BindingParameter, BindingRegistry, DirectInvoker, InMemoryBindingRegistry,
    StepArgumentTransformationBinding, StepTransformationBuilder, TransformHandler,
};
pub use conversion::{
    can_convert_simple, convert_simple, ConverterRegistry, StepArgumentConverter,
    StepArgumentTypeConverter, TextConverter, TypeConverter,
};
pub use error::{Error, Result};
pub use locale::Locale;
pub use tracer::{LogTracer, MemoryTracer, TestTracer};
pub use types::{BindingType, EnumType, RuntimeType, Table, TableRow, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
