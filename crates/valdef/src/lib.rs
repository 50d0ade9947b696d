//! Declarative validation of dynamic values against definition trees.
//!
//! valdef walks a value against a [`Definition`], fills defaults, coerces
//! datetimes, applies custom transforms, and reports every violation with
//! the path that produced it.
//!
//! # Crate Structure
//!
//! - [`value`] - The dynamic value model with shared containers
//! - [`definition`] - Definition trees, JSON conversion and the resolver
//! - [`validate`] - The interpreter, `either` backtracking and the meta-definition
//! - [`openapi`] - Projection into OpenAPI schema objects (behind `openapi` feature)
//!
//! ```
//! use serde_json::json;
//! use valdef::{Validator, Value};
//!
//! let validator = Validator::from_json(&json!({
//!     "type": "object",
//!     "schema": { "name": "string", "retries": { "type": "number", "default": 3 } }
//! }))?;
//!
//! let value = validator.validate(Value::from(json!({ "name": "job" })))?;
//! assert_eq!(value.field("retries"), Value::from(3));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Re-export value types.
pub mod value {
    pub use valdef_value::*;
}

/// Re-export definition types.
pub mod definition {
    pub use valdef_definition::*;
}

/// Re-export the validation engine.
pub mod validate {
    pub use valdef_validate::*;
}

/// Re-export the OpenAPI projector (requires `openapi` feature).
#[cfg(feature = "openapi")]
pub mod openapi {
    pub use valdef_openapi::*;
}

pub use valdef_definition::{Definition, DefinitionError, Node, ResolvePolicy, TypeName};
pub use valdef_validate::{
    check, validate, ValidateError, ValidateOptions, Validator, ValidatorConfig, Violation,
};
pub use valdef_value::Value;
