//! Scene-graph mirror for scenetable.
//!
//! This crate provides:
//! - [`MappingTable`] - How each record type is drawn
//! - [`SceneMirror`] - A [`Scene`] kept in sync with a collection's events

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod mapping;
pub mod scene;

pub use mapping::{Derivation, LabelHeight, MappingTable, Part, PropertyMap, RenderMapping, Source};
pub use scene::{Component, LabelNode, Scene, SceneMirror, SceneNode, SceneOptions};
