//! Integration tests for Layer 2: Table
//!
//! Tests moving collections through tables, column frames, and serialized
//! forms and back.

mod frames;
mod round_trips;
