//! Core values, identifiers, colors, and tables for scenetable.
//!
//! This crate provides:
//! - [`Value`] - The dynamically typed cell and attribute value
//! - [`RecordId`] - Hashable record identifiers
//! - [`Color`] - Validated colors
//! - [`AttrType`] - Attribute types with coercing validation
//! - [`Row`] and [`Table`] - The tabular representation
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod color;
pub mod error;
pub mod id;
pub mod row;
pub mod types;
pub mod value;

pub use collections::{LtMap, LtVec};
pub use color::Color;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::RecordId;
pub use row::{ID_COLUMN, Row, TYPE_COLUMN, Table};
pub use types::AttrType;
pub use value::Value;
