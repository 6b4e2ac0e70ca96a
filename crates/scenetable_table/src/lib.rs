//! Tabular adapter for scenetable.
//!
//! This crate provides:
//! - [`to_table`] and [`apply_table`] - Collection export and table application
//! - [`ColumnFrame`] - Column-oriented tables
//! - [`normalize`] - NaN handling and malformed optional columns
//! - JSON and `MessagePack` serialization of tables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adapter;
pub mod frame;
pub mod normalize;
pub mod serialize;

pub use adapter::{apply_table, to_table};
pub use frame::ColumnFrame;
pub use normalize::{NormalizeOptions, normalize};
pub use serialize::{from_json, from_msgpack, load_from_file, save_to_file, to_json, to_msgpack};
