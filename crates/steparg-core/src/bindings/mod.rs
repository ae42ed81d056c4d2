//! Step argument transformation bindings
//!
//! A transformation binding is a user-registered function that produces a
//! value of one declared type. It may be gated by an applicability pattern
//! whose capture groups become the function's own arguments.
//!
//! - [`builder`] - Fluent builder that validates bindings before registration
//! - [`registry`] - Read-only, stable-ordered binding registries
//! - [`invoker`] - Executes a selected binding with assembled arguments

pub mod builder;
pub mod invoker;
pub mod registry;

pub use builder::StepTransformationBuilder;
pub use invoker::{BindingInvoker, DirectInvoker};
pub use registry::{BindingRegistry, InMemoryBindingRegistry};

use crate::types::{BindingType, RuntimeType, Value};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Function executed when a transformation binding is applied
pub type TransformHandler = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// A declared parameter of a transformation binding
#[derive(Debug, Clone, PartialEq)]
pub struct BindingParameter {
    pub name: String,
    pub ty: BindingType,
}

impl BindingParameter {
    pub fn new(name: impl Into<String>, ty: impl Into<BindingType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A registered step argument transformation
#[derive(Clone)]
pub struct StepArgumentTransformationBinding {
    pub(crate) name: String,
    pub(crate) return_type: BindingType,
    pub(crate) regex: Option<Regex>,
    pub(crate) parameters: Vec<BindingParameter>,
    pub(crate) handler: TransformHandler,
}

impl StepArgumentTransformationBinding {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &BindingType {
        &self.return_type
    }

    /// Anchored applicability pattern, if the binding has one
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn parameters(&self) -> &[BindingParameter] {
        &self.parameters
    }

    pub fn handler(&self) -> &TransformHandler {
        &self.handler
    }

    /// Whether the first declared parameter is a table
    pub fn is_table_transformation(&self) -> bool {
        let table_name = RuntimeType::Table.to_string();
        self.parameters
            .first()
            .is_some_and(|p| p.ty.full_name() == table_name)
    }
}

impl fmt::Debug for StepArgumentTransformationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepArgumentTransformationBinding")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("regex", &self.regex.as_ref().map(Regex::as_str))
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
