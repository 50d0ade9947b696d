//! Dynamic value model for definition-driven validation.
//!
//! Values behave like loosely typed script values: containers are shared
//! handles onto interior-mutable storage, so a validator can fill defaults
//! and coerce fields in place while the caller keeps its own handle.
//! Containers carry an identity, which is what makes reference cycles
//! detectable.
//!
//! This is the lowest layer of valdef. Definitions, the validator and the
//! OpenAPI projector all operate on the [`Value`] type provided here.

pub mod accessor;
pub mod container;
pub mod function;
pub mod value;

pub use accessor::Accessor;
pub use container::{Array, ContainerId, Object};
pub use function::Function;
pub use value::Value;
