//! Type catalog built from the configuration file
//!
//! Resolves the type names used on the command line and in declarative
//! transformations, and turns those transformations into bindings the
//! conversion engine can run.

use crate::config::{Config, TransformationConfig};
use crate::error::{Error, Result};
use serde_json::Map;
use std::collections::BTreeMap;
use steparg_core::{
    BindingType, EnumType, InMemoryBindingRegistry, RuntimeType,
    StepArgumentTransformationBinding, StepTransformationBuilder, Value,
};

/// Enum types and transformations known to the CLI
#[derive(Debug, Default)]
pub struct Catalog {
    enums: BTreeMap<String, EnumType>,
}

impl Catalog {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut enums = BTreeMap::new();
        for (name, members) in &config.enums {
            if !is_type_name(name) {
                return Err(Error::config(format!("Invalid enum name '{}'", name)));
            }
            if members.is_empty() {
                return Err(Error::config(format!("Enum '{}' has no members", name)));
            }
            if RuntimeType::builtin(name).is_some() {
                return Err(Error::config(format!(
                    "Enum '{}' shadows a built-in type",
                    name
                )));
            }
            enums.insert(name.clone(), EnumType::new(name.clone(), members.clone()));
        }
        Ok(Self { enums })
    }

    /// Resolve a type name.
    ///
    /// Built-in names win, then catalog enums; any other identifier names
    /// an object type. A trailing `?` makes the type nullable.
    pub fn resolve(&self, name: &str) -> Result<RuntimeType> {
        let name = name.trim();
        if let Some(inner) = name.strip_suffix('?') {
            return self.resolve(inner).map(RuntimeType::nullable);
        }
        if let Some(ty) = RuntimeType::builtin(name) {
            return Ok(ty);
        }
        if let Some(ty) = self.enums.get(name) {
            return Ok(RuntimeType::Enum(ty.clone()));
        }
        if is_type_name(name) {
            return Ok(RuntimeType::Object(name.to_string()));
        }
        Err(Error::UnknownType {
            name: name.to_string(),
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumType> {
        self.enums.values()
    }

    /// Registry holding the configured transformations in file order
    pub fn registry(&self, transformations: &[TransformationConfig]) -> Result<InMemoryBindingRegistry> {
        let mut registry = InMemoryBindingRegistry::new();
        for definition in transformations {
            registry.register(self.transformation(definition)?);
        }
        Ok(registry)
    }

    /// Build one declarative transformation.
    ///
    /// The handler answers an object of the declared type whose payload maps
    /// every parameter name to its converted argument.
    pub fn transformation(&self, definition: &TransformationConfig) -> Result<StepArgumentTransformationBinding> {
        let returns = match self.resolve(&definition.returns)? {
            RuntimeType::Object(name) => name,
            other => {
                return Err(Error::config(format!(
                    "Transformation '{}' must return an object type, not {}",
                    definition.name, other
                )))
            }
        };

        let mut builder = StepTransformationBuilder::new(
            definition.name.clone(),
            BindingType::Runtime(RuntimeType::Object(returns.clone())),
        );
        if let Some(pattern) = &definition.pattern {
            builder = builder.regex(pattern.clone());
        }

        let mut names = Vec::with_capacity(definition.parameters.len());
        for parameter in &definition.parameters {
            builder = builder.parameter(parameter.name.clone(), self.resolve(&parameter.type_name)?);
            names.push(parameter.name.clone());
        }

        let binding = builder
            .handler(move |args: &[Value]| {
                let payload: Map<String, serde_json::Value> = names
                    .iter()
                    .cloned()
                    .zip(args.iter().map(Value::to_json))
                    .collect();
                Ok(Value::object(returns.clone(), payload.into()))
            })
            .build()?;

        tracing::debug!(
            transformation = %definition.name,
            returns = %definition.returns,
            parameters = definition.parameters.len(),
            "Registered declarative transformation"
        );
        Ok(binding)
    }
}

fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}
