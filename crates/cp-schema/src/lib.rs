//! # cp-schema: Contract Shapes & Validation
//!
//! Declarative shapes for ControlPlane contract records and the engine that
//! checks untyped JSON against them.
//!
//! ## Responsibilities
//!
//! - **Shapes:** [`Shape`], [`Field`] and [`FieldKind`] describe a record's
//!   fields, their semantic types, which are required, and declared defaults.
//!   Shapes are `const` data, built once and never mutated.
//! - **Validation:** [`check`] walks a JSON value against a shape, collects
//!   every field-level problem, and returns a normalized mapping with
//!   defaults substituted.
//! - **Audit:** [`audit_shape`] flags shapes whose declarations disagree with
//!   themselves (required fields carrying defaults, defaults that would not
//!   pass their own field type, and so on).
//!
//! This crate knows nothing about concrete models. The typed records, the
//! name registry, and the decode step live in `cp-models`.

pub mod audit;
pub mod error;
pub mod shape;
pub mod validate;

// Re-export primary types.
pub use audit::{audit_shape, ShapeFinding, ShapeFindingKind};
pub use error::{FieldIssue, FieldPath, IssueKind, PathSegment, SchemaError, ValidationError};
pub use shape::{DefaultValue, Field, FieldKind, Shape};
pub use validate::check;
