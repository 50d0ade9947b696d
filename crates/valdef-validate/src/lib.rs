//! Definition-driven validation of dynamic values.
//!
//! [`validate`] walks a [`Value`](valdef_value::Value) against a
//! [`Definition`](valdef_definition::Definition), fills defaults, coerces
//! datetimes, applies `custom` transforms and reports every violation with
//! its path (`value.body.checkpoints[1] is not object`). Violations are
//! collected, not raised; only a broken definition, or `assert` mode, makes
//! a call fail.
//!
//! [`Validator`] wraps a definition that has been checked against the
//! [`meta_definition`], the definition of definitions.

pub mod config;
pub mod error;
pub mod validator;

mod context;
mod either;
mod engine;
mod keywords;
mod meta;

pub use config::{ValidateOptions, ValidatorConfig, DEFAULT_PREFIX};
pub use engine::{check, validate, Outcome};
pub use error::{Result, ValidateError, Violation};
pub use meta::meta_definition;
pub use validator::Validator;
