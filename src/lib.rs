//! Scenetable - Tables of shape records reconciled into an observable scene
//!
//! This crate re-exports all layers of the Scenetable system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: scenetable_view       — Render mappings, scene-graph mirror
//! Layer 2: scenetable_table      — Export, normalization, column frames, JSON/MessagePack
//! Layer 1: scenetable_storage    — Schemas, records, collections, batches, reconcile
//! Layer 0: scenetable_foundation — Core types (Value, Color, RecordId, Row, Table, Error)
//! ```

pub use scenetable_foundation as foundation;
pub use scenetable_storage as storage;
pub use scenetable_table as table;
pub use scenetable_view as view;
