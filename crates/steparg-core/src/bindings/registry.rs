//! Binding registries
//!
//! The converter only reads registries. Iteration order is the order in
//! which bindings were registered and decides which binding wins when
//! several match.

use super::StepArgumentTransformationBinding;

/// Source of registered step argument transformations
pub trait BindingRegistry: Send + Sync {
    /// All registered transformations, in stable registration order
    fn step_transformations(&self) -> &[StepArgumentTransformationBinding];
}

/// Registry holding its bindings in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryBindingRegistry {
    transformations: Vec<StepArgumentTransformationBinding>,
}

impl InMemoryBindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformation after all previously registered ones
    pub fn register(&mut self, binding: StepArgumentTransformationBinding) {
        log::debug!("Registering step argument transformation '{}'", binding.name());
        self.transformations.push(binding);
    }

    /// Builder-style variant of [`InMemoryBindingRegistry::register`]
    pub fn with_transformation(mut self, binding: StepArgumentTransformationBinding) -> Self {
        self.register(binding);
        self
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }
}

impl BindingRegistry for InMemoryBindingRegistry {
    fn step_transformations(&self) -> &[StepArgumentTransformationBinding] {
        &self.transformations
    }
}
