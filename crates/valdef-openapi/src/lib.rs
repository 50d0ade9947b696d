//! Projection of definitions into OpenAPI schema objects.
//!
//! [`project`] is a pure function of a [`Definition`](valdef_definition::Definition):
//! it never sees data and reports nothing but broken definitions. Only the
//! keywords OpenAPI can express are carried over; `either` and `custom`
//! have no projection and are left out.

pub mod projector;

pub use projector::project;
