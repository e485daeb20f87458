//! Target entity descriptors.
//!
//! Descriptors are static metadata about the entities declared in code. How
//! they are produced (hand-written, derived, loaded from JSON) is up to the
//! [`DescriptorSource`] implementation.

mod entity;
mod field;
mod source;
mod types;

pub use entity::EntityDescriptor;
pub use field::{FieldAttributes, FieldDescriptor, FieldModifiers};
pub use source::{DescriptorSource, Model, ModelSet};
pub use types::{DeclaredType, Primitive};
