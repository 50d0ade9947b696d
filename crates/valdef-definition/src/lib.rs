//! Definition trees and the definition resolver.
//!
//! A [`Definition`] is one of three forms:
//! - a type-name shorthand (`"string"` is `{type: string}`)
//! - a thunk, a deferred producer re-invoked on every visit, which is how a
//!   definition refers to itself
//! - a structured [`Node`] of keywords
//!
//! [`resolve`] normalizes any of them into a [`Resolved`] node with the
//! implicit keyword defaults filled in. [`Definition::from_json`] accepts
//! definitions authored as in-memory JSON and rejects unknown keywords.

pub mod config;
pub mod definition;
pub mod error;
pub mod json;
pub mod keyword;
pub mod lower;
pub mod resolve;

pub use config::ResolvePolicy;
pub use definition::{DefaultValue, Definition, Fields, Node, Thunk, Transform};
pub use error::{DefinitionError, Result};
pub use keyword::{Bounds, Comparator, TypeName, KEYWORDS};
pub use resolve::{resolve, Resolved, MAX_THUNK_CHAIN};
