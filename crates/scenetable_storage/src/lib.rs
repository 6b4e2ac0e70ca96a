//! Shape schemas, records, and the observable record collection for
//! scenetable.
//!
//! This crate provides:
//! - [`ShapeSchema`] and [`ShapeKind`] - Record types and their attributes
//! - [`SchemaRegistry`] - Type-tag resolution
//! - [`Record`] - Validated attribute values under an immutable id
//! - [`Collection`] - The id-unique, ordered, observable container
//! - [`Batch`] - All-or-nothing mutation with held notifications
//! - Reconciliation of a collection against a [`Table`](scenetable_foundation::Table)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;
pub mod collection;
pub mod config;
pub mod event;
pub mod export;
pub mod reconcile;
pub mod record;
pub mod registry;
pub mod schema;

pub use batch::{Batch, ChangeSummary};
pub use collection::{AttributeQuery, Collection};
pub use config::CollectionConfig;
pub use event::{AttributeChange, AttributeFilter, EventBus, StructuralChange, SubscriptionId};
pub use export::ExportOptions;
pub use reconcile::ReconcileOptions;
pub use record::Record;
pub use registry::SchemaRegistry;
pub use schema::{AttributeSchema, ShapeKind, ShapeSchema};
