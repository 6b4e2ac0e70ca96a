//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Color, AttrType, RecordId, Row, Table, and Error.

mod colors;
mod tables;
mod values;
